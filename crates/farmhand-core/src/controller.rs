// ── Panel controller ──
//
// Owns the authoritative livestock snapshot and mediates every read and
// write against the farm backend. Reconciliation is deliberate: every
// accepted mutation is followed by a delayed full re-fetch instead of a
// local patch, so the snapshot always equals the last successful fetch.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use farmhand_api::types::{LivestockRecord, UpdateAction};
use farmhand_api::{FarmClient, TransportConfig};

use crate::command::{Command, CommandEnvelope};
use crate::config::PanelConfig;
use crate::error::CoreError;
use crate::filter::{FilterPanel, QueryMode};
use crate::model::{AnimalType, Livestock, ResourceTotals, TagId, VetRecord};
use crate::store::SnapshotStore;

use strum::IntoEnumIterator;

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── Panel ────────────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<PanelInner>`. Owns the snapshot store,
/// the filter composer state, and the command channel; every data-
/// boundary call flows through it.
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    config: PanelConfig,
    client: FarmClient,
    store: SnapshotStore,
    filter: Mutex<FilterPanel>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Panel {
    /// Create a new Panel from configuration. Does NOT fetch anything --
    /// call [`start()`](Self::start) to load the initial snapshot and
    /// spawn the command processor.
    pub fn new(config: PanelConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let client = FarmClient::new(config.server.as_str(), &transport)?;
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(PanelInner {
                config,
                client,
                store: SnapshotStore::new(),
                filter: Mutex::new(FilterPanel::new()),
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Access the panel configuration.
    pub fn config(&self) -> &PanelConfig {
        &self.inner.config
    }

    /// Access the underlying snapshot store.
    pub fn store(&self) -> &SnapshotStore {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mount the panel: spawn the command processor, load the initial
    /// snapshot, and populate the per-category counts.
    ///
    /// An initial-fetch failure is returned but not fatal — the panel
    /// stays mounted and the caller can retry with [`sync()`](Self::sync).
    pub async fn start(&self) -> Result<(), CoreError> {
        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let panel = self.clone();
            self.inner
                .task_handles
                .lock()
                .await
                .push(tokio::spawn(command_processor_task(panel, rx)));
        }

        let first_sync = self.sync(false).await;
        self.refresh_counts().await;

        if first_sync.is_ok() {
            info!("panel started");
        }
        first_sync
    }

    /// Shut down background tasks. Pending deferred syncs are dropped.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("panel shut down");
    }

    // ── Filter composer access ───────────────────────────────────────

    /// Snapshot of the current filter panel state.
    pub async fn filter(&self) -> FilterPanel {
        self.inner.filter.lock().await.clone()
    }

    /// Edit the filter panel state under the lock.
    pub async fn edit_filter<R>(&self, edit: impl FnOnce(&mut FilterPanel) -> R) -> R {
        let mut filter = self.inner.filter.lock().await;
        edit(&mut filter)
    }

    /// Reset every constraint to neutral, disable the panel, and
    /// immediately re-fetch unfiltered — clearing is never deferred.
    pub async fn clear_filters(&self) -> Result<(), CoreError> {
        self.edit_filter(FilterPanel::clear).await;
        self.sync(true).await
    }

    // ── Sync ─────────────────────────────────────────────────────────

    /// Fetch the collection and replace the snapshot wholesale.
    ///
    /// The filter composer decides between an unfiltered and a filtered
    /// fetch; `override_all` forces the former regardless of filter
    /// state. On failure the previous snapshot and load state are left
    /// untouched and the error is returned for the caller to report.
    pub async fn sync(&self, override_all: bool) -> Result<(), CoreError> {
        let mode = self.inner.filter.lock().await.resolve(override_all);
        let previous = self.inner.store.begin_load();

        let fetched = match &mode {
            QueryMode::FetchAll => self.inner.client.list_livestock().await,
            QueryMode::FetchFiltered(criteria) => {
                self.inner.client.list_filtered(&criteria.to_query()).await
            }
        };

        match fetched {
            Ok(records) => {
                let mut livestock = Vec::with_capacity(records.len());
                for record in records {
                    match Livestock::try_from(record) {
                        Ok(l) => livestock.push(l),
                        // One bad row must not blank the whole herd.
                        Err(e) => warn!(error = %e, "skipping malformed livestock row"),
                    }
                }
                debug!(
                    count = livestock.len(),
                    filtered = matches!(mode, QueryMode::FetchFiltered(_)),
                    "sync complete"
                );
                self.inner.store.complete_load(livestock);
                Ok(())
            }
            Err(e) => {
                self.inner.store.abort_load(previous);
                warn!(error = %e, "sync failed; keeping previous snapshot");
                Err(e.into())
            }
        }
    }

    /// Defer a `sync()` by the given delay.
    ///
    /// Each call spawns its own detached task — deliberately neither
    /// cancellable nor coalesced, so a burst of mutations produces a
    /// matching burst of harmless re-fetches.
    pub fn schedule_sync(&self, delay: Duration) {
        let panel = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = panel.inner.cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Err(e) = panel.sync(false).await {
                        warn!(error = %e, "deferred sync failed");
                    }
                }
            }
        });
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add a new record to the herd.
    pub async fn insert(&self, livestock: Livestock) -> Result<(), CoreError> {
        self.execute(Command::Insert(livestock)).await
    }

    /// Feed one animal.
    pub async fn feed(&self, tag: TagId) -> Result<(), CoreError> {
        self.execute(Command::Feed { tag }).await
    }

    /// Harvest from one animal. Fails locally with
    /// [`CoreError::NotHarvestable`] — without issuing a request — when
    /// the record is not harvestable. The backend remains the authority
    /// for requests that do go out.
    pub async fn harvest(&self, tag: TagId) -> Result<(), CoreError> {
        self.execute(Command::Harvest { tag }).await
    }

    /// Retire one animal. Callers present the confirmation prompt;
    /// this is the post-confirmation path and issues exactly one
    /// delete followed by one scheduled re-sync.
    pub async fn terminate(&self, tag: TagId) -> Result<(), CoreError> {
        self.execute(Command::Terminate { tag }).await
    }

    /// Route a command through the processor task and await its result.
    pub async fn execute(&self, command: Command) -> Result<(), CoreError> {
        let (response_tx, response_rx) = oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command,
                response_tx,
            })
            .await
            .map_err(|_| CoreError::PanelClosed)?;
        response_rx.await.map_err(|_| CoreError::PanelClosed)?
    }

    /// Execute one command against the backend. Runs on the command
    /// processor task. A confirmed success schedules the follow-up
    /// re-sync; failures propagate without scheduling anything.
    async fn run_command(&self, command: Command) -> Result<(), CoreError> {
        match command {
            Command::Insert(livestock) => {
                let record = LivestockRecord::from(&livestock);
                self.inner.client.insert(&record).await?;
                info!(tag = %livestock.tag, "livestock added");
            }
            Command::Feed { tag } => {
                let record = self.require_record(tag)?;
                self.inner.client.update(&record, UpdateAction::Feed).await?;
                debug!(tag = %tag, "livestock fed");
            }
            Command::Harvest { tag } => {
                let current = self
                    .inner
                    .store
                    .find(tag)
                    .ok_or(CoreError::RecordNotFound { tag: tag.get() })?;
                if !current.harvestable {
                    return Err(CoreError::NotHarvestable { tag: tag.get() });
                }
                let record = LivestockRecord::from(current.as_ref());
                self.inner
                    .client
                    .update(&record, UpdateAction::Harvest)
                    .await?;
                debug!(tag = %tag, "livestock harvested");
            }
            Command::Terminate { tag } => {
                self.inner.client.delete(tag.get()).await?;
                info!(tag = %tag, "livestock terminated");
            }
        }

        self.schedule_sync(self.inner.config.sync_delay);
        Ok(())
    }

    fn require_record(&self, tag: TagId) -> Result<LivestockRecord, CoreError> {
        self.inner
            .store
            .find(tag)
            .map(|l| LivestockRecord::from(l.as_ref()))
            .ok_or(CoreError::RecordNotFound { tag: tag.get() })
    }

    // ── Ad-hoc report queries ────────────────────────────────────────
    //
    // These bypass the store and query the backend directly. `Ok(None)`
    // is the explicit "no data available" case — distinct from both an
    // error and an empty herd.

    /// Cumulative resources spent on one animal.
    pub async fn resource_report(&self, tag: TagId) -> Result<Option<ResourceTotals>, CoreError> {
        let entry = self.inner.client.resources_spent(tag.get()).await?;
        Ok(entry.map(ResourceTotals::from))
    }

    /// Veterinary history for one animal.
    pub async fn vet_report(&self, tag: TagId) -> Result<Option<VetRecord>, CoreError> {
        let entry = self.inner.client.vet_records(tag.get()).await?;
        Ok(entry.map(VetRecord::from))
    }

    // ── Per-category counts ──────────────────────────────────────────

    /// Fetch the herd count for every animal category and merge the
    /// results into a single table.
    ///
    /// Requests fan out concurrently; a failing category is logged and
    /// omitted without discarding the others, and the store receives
    /// exactly one update after all requests settle.
    pub async fn refresh_counts(&self) -> BTreeMap<AnimalType, u64> {
        let client = &self.inner.client;

        let fetches = AnimalType::iter().map(|animal| async move {
            match client.count_by_type(&animal.to_string()).await {
                Ok(entries) => {
                    let count = entries.first().map_or(0, |entry| entry.count);
                    Some((animal, count))
                }
                Err(e) => {
                    warn!(animal = %animal, error = %e, "count fetch failed; keeping other categories");
                    None
                }
            }
        });

        let merged: BTreeMap<AnimalType, u64> = futures_util::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        self.inner.store.set_counts(merged.clone());
        merged
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Drains the command channel, executing one command at a time and
/// answering each envelope's oneshot.
async fn command_processor_task(panel: Panel, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = panel.inner.cancel.clone();
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            maybe_envelope = rx.recv() => {
                let Some(envelope) = maybe_envelope else { break };
                let result = panel.run_command(envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
    debug!("command processor stopped");
}
