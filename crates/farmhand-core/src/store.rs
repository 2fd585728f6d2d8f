// ── Reactive snapshot store ──
//
// Watch-based storage for the livestock snapshot, per-category counts,
// and load state. The snapshot is owned exclusively by the panel
// controller: it starts as `None` ("not yet loaded"), is replaced
// wholesale on every successful fetch, and is never patched in place —
// a missed optimistic-update case can therefore never desync the view.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{AnimalType, Livestock, TagId};
use crate::stream::SnapshotStream;

/// The livestock collection as of the last successful fetch.
pub type Snapshot = Arc<Vec<Arc<Livestock>>>;

/// Load state of the panel's snapshot.
///
/// `Uninitialized → Loading → Loaded` on first mount, then
/// `Loaded → Loading → Loaded` on every sync. There is no terminal
/// error state — a failed sync restores the prior state and the
/// controller stays ready to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Uninitialized,
    Loading,
    Loaded,
}

/// Central reactive store for the management panel.
///
/// Mutations are broadcast to subscribers via `watch` channels; reads
/// are cheap `Arc` clones of the current snapshot.
pub struct SnapshotStore {
    snapshot: watch::Sender<Option<Snapshot>>,
    counts: watch::Sender<Arc<BTreeMap<AnimalType, u64>>>,
    load_state: watch::Sender<LoadState>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (counts, _) = watch::channel(Arc::new(BTreeMap::new()));
        let (load_state, _) = watch::channel(LoadState::default());

        Self {
            snapshot,
            counts,
            load_state,
        }
    }

    // ── Snapshot access ──────────────────────────────────────────────

    /// Current snapshot; `None` until the first successful fetch.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.borrow().clone()
    }

    /// Look up one record by tag in the current snapshot.
    pub fn find(&self, tag: TagId) -> Option<Arc<Livestock>> {
        self.snapshot
            .borrow()
            .as_ref()
            .and_then(|snap| snap.iter().find(|l| l.tag == tag).cloned())
    }

    /// Number of records in the current snapshot.
    pub fn len(&self) -> usize {
        self.snapshot.borrow().as_ref().map_or(0, |snap| snap.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load_state(&self) -> LoadState {
        *self.load_state.borrow()
    }

    pub fn counts(&self) -> Arc<BTreeMap<AnimalType, u64>> {
        self.counts.borrow().clone()
    }

    // ── Load cycle ───────────────────────────────────────────────────

    /// Enter `Loading`, returning the state to restore if the fetch
    /// fails.
    pub(crate) fn begin_load(&self) -> LoadState {
        let previous = *self.load_state.borrow();
        self.load_state.send_replace(LoadState::Loading);
        previous
    }

    /// Replace the snapshot wholesale and enter `Loaded`.
    pub(crate) fn complete_load(&self, records: Vec<Livestock>) {
        let snapshot: Snapshot = Arc::new(records.into_iter().map(Arc::new).collect());
        self.snapshot.send_replace(Some(snapshot));
        self.load_state.send_replace(LoadState::Loaded);
    }

    /// A fetch failed: keep the snapshot untouched and restore the
    /// pre-`Loading` state.
    pub(crate) fn abort_load(&self, previous: LoadState) {
        self.load_state.send_replace(previous);
    }

    /// Replace the per-category count table in one update.
    pub(crate) fn set_counts(&self, counts: BTreeMap<AnimalType, u64>) {
        self.counts.send_replace(Arc::new(counts));
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_livestock(&self) -> SnapshotStream {
        SnapshotStream::new(self.snapshot.subscribe())
    }

    pub fn subscribe_counts(&self) -> watch::Receiver<Arc<BTreeMap<AnimalType, u64>>> {
        self.counts.subscribe()
    }

    pub fn subscribe_load_state(&self) -> watch::Receiver<LoadState> {
        self.load_state.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{AnimalType, Diet};

    fn animal(tag: u32, harvestable: bool) -> Livestock {
        Livestock {
            tag: TagId::new(tag).unwrap(),
            animal_type: AnimalType::Cow,
            age: 2,
            diet: Diet::Wheat,
            weight: 150.0,
            last_fed: None,
            harvestable,
            last_harvested: None,
            food_spent: None,
            water_spent: None,
        }
    }

    #[test]
    fn snapshot_starts_unloaded() {
        let store = SnapshotStore::new();
        assert!(store.snapshot().is_none());
        assert_eq!(store.load_state(), LoadState::Uninitialized);
    }

    #[test]
    fn complete_load_replaces_wholesale() {
        let store = SnapshotStore::new();
        store.complete_load(vec![animal(4001, false), animal(4002, true)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.load_state(), LoadState::Loaded);

        store.complete_load(vec![animal(4003, false)]);
        let snap = store.snapshot().unwrap();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].tag.get(), 4003);
    }

    #[test]
    fn failed_first_load_restores_uninitialized() {
        let store = SnapshotStore::new();
        let previous = store.begin_load();
        assert_eq!(store.load_state(), LoadState::Loading);

        store.abort_load(previous);
        assert_eq!(store.load_state(), LoadState::Uninitialized);
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn failed_resync_keeps_snapshot_and_loaded_state() {
        let store = SnapshotStore::new();
        store.complete_load(vec![animal(4001, true)]);

        let previous = store.begin_load();
        store.abort_load(previous);

        assert_eq!(store.load_state(), LoadState::Loaded);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_by_tag() {
        let store = SnapshotStore::new();
        store.complete_load(vec![animal(4001, false), animal(4002, true)]);

        let found = store.find(TagId::new(4002).unwrap()).unwrap();
        assert!(found.harvestable);
        assert!(store.find(TagId::new(4900).unwrap()).is_none());
    }

    #[tokio::test]
    async fn subscribers_see_replacements() {
        let store = SnapshotStore::new();
        let mut stream = store.subscribe_livestock();
        assert!(stream.current().is_none());

        store.complete_load(vec![animal(4001, false)]);
        let snap = stream.changed().await.unwrap().unwrap();
        assert_eq!(snap.len(), 1);
    }
}
