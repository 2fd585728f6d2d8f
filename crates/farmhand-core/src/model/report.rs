// ── Per-record derived reports ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farmhand_api::types::{ResourcesSpentEntry, VetRecordEntry};

/// Cumulative resources sunk into one animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub food: u32,
    pub water: u32,
}

impl From<ResourcesSpentEntry> for ResourceTotals {
    fn from(entry: ResourcesSpentEntry) -> Self {
        Self {
            food: entry.total_food_consumed,
            water: entry.total_water_consumed,
        }
    }
}

/// One veterinary history entry for an animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetRecord {
    pub record_id: u32,
    pub health_status: String,
    pub record_date: Option<NaiveDate>,
}

impl From<VetRecordEntry> for VetRecord {
    fn from(entry: VetRecordEntry) -> Self {
        Self {
            record_id: entry.record_id,
            health_status: entry.health_status,
            record_date: entry.record_date,
        }
    }
}
