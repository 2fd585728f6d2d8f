// farmhand-api: Async Rust client for the farm-management backend REST API.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::FarmClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{
    Bounds, CategorySelector, CountEntry, LivestockQuery, LivestockRecord, ResourcesSpentEntry,
    TriState, UpdateAction, VetRecordEntry,
};
