// ── Command API ──
//
// All write operations flow through a unified `Command` enum, routed
// over an mpsc channel to the panel's command processor. Reads bypass
// the channel via direct store snapshots or ad-hoc API queries.
//
// Every command yields an awaited result: the caller observes the
// outcome before any follow-up sync is scheduled, so a failed mutation
// can never silently trigger a pointless re-fetch.

use crate::error::CoreError;
use crate::model::{Livestock, TagId};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<(), CoreError>>,
}

/// All possible write operations against the farm backend.
#[derive(Debug, Clone)]
pub enum Command {
    /// Add a new record to the herd.
    Insert(Livestock),
    /// Feed one animal.
    Feed { tag: TagId },
    /// Harvest from one animal. Rejected locally when the record is not
    /// harvestable — the request never reaches the backend.
    Harvest { tag: TagId },
    /// Retire one animal. Interactive confirmation happens upstream;
    /// by the time this command is issued the decision is final.
    Terminate { tag: TagId },
}
