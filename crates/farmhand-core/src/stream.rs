// ── Reactive snapshot streams ──
//
// Subscription handles for consuming snapshot changes from the
// SnapshotStore.

use tokio::sync::watch;

use crate::store::Snapshot;

/// A subscription to the livestock snapshot.
///
/// Provides both point-in-time access and reactive change notification.
/// The item is `Option<Snapshot>` — `None` means the panel has not yet
/// completed a fetch.
pub struct SnapshotStream {
    current: Option<Snapshot>,
    receiver: watch::Receiver<Option<Snapshot>>,
}

impl SnapshotStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Snapshot>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at the last observation point.
    pub fn current(&self) -> &Option<Snapshot> {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> Option<Snapshot> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new value.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Snapshot>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }
}
