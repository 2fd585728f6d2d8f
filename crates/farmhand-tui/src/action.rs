//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use farmhand_core::store::LoadState;
use farmhand_core::{
    AnimalType, FilterCriteria, Livestock, ResourceTotals, Snapshot, TagId, VetRecord,
};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Pending confirmation action. Terminating livestock is the only
/// destructive operation, and the only one that asks first.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    Terminate { tag: TagId, animal: AnimalType },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminate { tag, animal } => {
                write!(f, "Terminate {} #{tag}? This cannot be undone.", animal.label())
            }
        }
    }
}

/// Content for the single modal overlay.
///
/// One presentation at a time: showing a new modal replaces the
/// current one, and dismissal always returns to the panel. Reports
/// carry an explicit "no data" case (`None`) — an animal without
/// consumption rows is not an error and not an empty herd.
#[derive(Debug, Clone)]
pub enum ModalContent {
    Resources {
        tag: TagId,
        animal: AnimalType,
        totals: Option<ResourceTotals>,
    },
    VetHistory {
        tag: TagId,
        animal: AnimalType,
        record: Option<VetRecord>,
    },
    /// Blocking acknowledgment for a failed backend operation.
    Failure { title: String, message: String },
}

impl ModalContent {
    pub fn failure(title: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Failure {
            title: title.into(),
            message: message.to_string(),
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Data events (from the core store streams) ──────────────────
    LivestockUpdated(Option<Snapshot>),
    CountsUpdated(Arc<BTreeMap<AnimalType, u64>>),
    LoadStateChanged(LoadState),

    // ── Sync & filter ──────────────────────────────────────────────
    RequestSync,
    /// Push composed criteria to the filter composer and re-fetch.
    ApplyFilters(FilterCriteria),
    ClearFilters,
    ToggleFilterForm,
    ToggleAddForm,

    // ── Record mutations ───────────────────────────────────────────
    SubmitAdd(Livestock),
    RequestFeed(TagId),
    RequestHarvest(TagId),
    RequestTerminate(TagId),
    RefreshCounts,

    // ── Reports ────────────────────────────────────────────────────
    RequestResourceReport(TagId),
    RequestVetReport(TagId),

    // ── Confirm dialog ─────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Modal overlay ──────────────────────────────────────────────
    ShowModal(ModalContent),
    CloseModal,

    // ── Focus ──────────────────────────────────────────────────────
    FocusList,

    // ── Notifications ──────────────────────────────────────────────
    Notify(Notification),
}
