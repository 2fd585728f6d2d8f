//! Reactive data layer between `farmhand-api` and the management panel.
//!
//! This crate owns the business logic and domain model for the farmhand
//! workspace:
//!
//! - **[`Panel`]** — Central facade managing the panel lifecycle:
//!   [`start()`](Panel::start) performs the initial sync and spawns the
//!   command processor; every read and write against the backend flows
//!   through it.
//!
//! - **[`FilterPanel`]** / [`filter::resolve`] — The filter composer:
//!   per-field constraint state with sentinel-aware emptiness, reduced
//!   to a single [`QueryMode`] decision (fetch-all vs fetch-filtered).
//!
//! - **[`SnapshotStore`]** — Watch-based reactive storage for the
//!   livestock snapshot, per-category counts, and load state. Snapshots
//!   are replaced wholesale after every successful fetch — never patched
//!   in place — so the view can never drift from the last server answer.
//!
//! - **[`Command`]** — Typed mutation requests routed through an `mpsc`
//!   channel to the panel's command processor. Every mutation yields an
//!   awaited result; only a confirmed success schedules the follow-up
//!   re-sync.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Livestock`,
//!   `TagId`, `AnimalType`, `Diet`) converted from the looser wire types
//!   in `farmhand-api`.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::Command;
pub use config::PanelConfig;
pub use controller::Panel;
pub use error::CoreError;
pub use filter::{FilterCriteria, FilterPanel, QueryMode};
pub use store::{LoadState, Snapshot, SnapshotStore};
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{AnimalType, Diet, Livestock, ResourceTotals, TagId, VetRecord};
