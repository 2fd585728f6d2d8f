// Wire types for the farm-management backend.
//
// Field names follow the backend's JSON contract (`tagID`, `animalType`,
// `lastViolatedForHarvestedGoods`, ...). These are deliberately loose:
// categories are plain strings and dates tolerate garbage — canonical,
// validated domain types live in `farmhand-core`.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Livestock record ────────────────────────────────────────────────

/// One livestock row as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockRecord {
    #[serde(rename = "tagID")]
    pub tag_id: u32,
    pub animal_type: String,
    pub age: u32,
    pub diet: String,
    pub weight: f64,
    /// `YYYY-MM-DD`, may be null or unparseable (treated as unset).
    #[serde(default, with = "lenient_date")]
    pub last_fed: Option<NaiveDate>,
    pub harvestable: bool,
    /// The backend's name for the last extraction date.
    #[serde(
        default,
        with = "lenient_date",
        rename = "lastViolatedForHarvestedGoods"
    )]
    pub last_harvested: Option<NaiveDate>,
    /// Cumulative consumption columns — present on some payloads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_spent: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_spent: Option<u32>,
}

// ── Filter query ────────────────────────────────────────────────────

/// Inclusive numeric bounds. `-1` on either end means "not set"
/// for fields whose neutral value is the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: i32,
    pub max: i32,
}

/// A category constraint: a concrete value, or the `"all"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelector {
    All,
    Only(String),
}

impl Serialize for CategorySelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Only(value) => serializer.serialize_str(value),
        }
    }
}

impl<'de> Deserialize<'de> for CategorySelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == "all" {
            Self::All
        } else {
            Self::Only(raw)
        })
    }
}

/// A boolean constraint with an `"all"` sentinel: the wire value is
/// either the string `"all"` or a bare JSON boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    All,
    Yes,
    No,
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::Yes => serializer.serialize_bool(true),
            Self::No => serializer.serialize_bool(false),
        }
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Flag(bool),
            Text(String),
        }
        match Wire::deserialize(deserializer)? {
            Wire::Flag(true) => Ok(Self::Yes),
            Wire::Flag(false) => Ok(Self::No),
            Wire::Text(s) if s == "all" => Ok(Self::All),
            Wire::Text(s) => Err(D::Error::custom(format!("invalid tri-state value: {s}"))),
        }
    }
}

/// The filter-criteria body for `POST /api/livestock/filter`.
///
/// Mirrors the shape the management panel has always sent: nested
/// `{min, max}` objects for the range fields, `"all"` sentinels for the
/// category and tri-state fields, `-1` for unset consumption minima.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivestockQuery {
    #[serde(rename = "tagID")]
    pub tag_id: Bounds,
    pub animal_type: CategorySelector,
    pub age: Bounds,
    pub diet: CategorySelector,
    pub harvestable: TriState,
    pub min_food_spent: i32,
    pub min_water_spent: i32,
}

// ── Mutations ───────────────────────────────────────────────────────

/// Update actions the backend accepts for an existing record.
/// Termination is a separate delete endpoint, not an update action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateAction {
    Feed,
    Harvest,
}

impl UpdateAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Harvest => "harvest",
        }
    }
}

// ── Reports ─────────────────────────────────────────────────────────

/// One entry of `GET /api/livestock/count?animalType=...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    pub animal_type: String,
    pub count: u64,
}

/// One entry of `GET /api/livestock/{tagID}/resources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesSpentEntry {
    pub total_food_consumed: u32,
    pub total_water_consumed: u32,
}

/// One entry of `GET /api/livestock/{tagID}/vet-records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetRecordEntry {
    #[serde(rename = "recordID")]
    pub record_id: u32,
    #[serde(rename = "healthstatus")]
    pub health_status: String,
    #[serde(default, with = "lenient_date")]
    pub record_date: Option<NaiveDate>,
}

// ── Lenient date (de)serialization ──────────────────────────────────

/// Backend dates are SQL `YYYY-MM-DD` strings that may be null or
/// malformed; anything unparseable deserializes as `None` rather than
/// failing the whole payload.
mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }
}
