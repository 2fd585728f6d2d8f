// ── Livestock identity and record types ──
//
// TagId is the sole identity within a herd: an integer restricted to
// the 4000..=4999 ear-tag band. The enums are closed sets matching the
// backend schema; unknown wire values fail conversion rather than
// leaking into the domain.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

use farmhand_api::types::LivestockRecord;

// ── Errors ──────────────────────────────────────────────────────────

/// Failure converting wire data into domain types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("tag #{0} is outside the 4000..=4999 ear-tag band")]
    TagOutOfBand(u32),

    #[error("unknown animal type: {0}")]
    UnknownAnimalType(String),

    #[error("unknown diet: {0}")]
    UnknownDiet(String),
}

// ── TagId ───────────────────────────────────────────────────────────

/// Ear-tag identifier, unique within the herd.
///
/// The farm allocates livestock tags from a fixed numeric band;
/// anything outside it is a data error, not a record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct TagId(u32);

impl TagId {
    /// Lowest tag the farm issues.
    pub const MIN: u32 = 4000;
    /// Highest tag the farm issues.
    pub const MAX: u32 = 4999;

    pub fn new(raw: u32) -> Result<Self, ModelError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(ModelError::TagOutOfBand(raw))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TagId {
    type Error = ModelError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<TagId> for u32 {
    fn from(tag: TagId) -> Self {
        tag.0
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Category enums ──────────────────────────────────────────────────

/// The closed set of animal categories the farm keeps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AnimalType {
    Cow,
    Chicken,
    Pig,
    Sheep,
}

impl AnimalType {
    /// Capitalized label for display surfaces.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cow => "Cow",
            Self::Chicken => "Chicken",
            Self::Pig => "Pig",
            Self::Sheep => "Sheep",
        }
    }
}

/// What a livestock record is fed — the farm's crop types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Diet {
    Canola,
    Wheat,
    Corn,
    Potatoes,
    Mustard,
    Coconut,
}

impl Diet {
    pub fn label(self) -> &'static str {
        match self {
            Self::Canola => "Canola",
            Self::Wheat => "Wheat",
            Self::Corn => "Corn",
            Self::Potatoes => "Potatoes",
            Self::Mustard => "Mustard",
            Self::Coconut => "Coconut",
        }
    }
}

// ── Livestock ───────────────────────────────────────────────────────

/// One animal in the herd, as the panel reasons about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Livestock {
    pub tag: TagId,
    pub animal_type: AnimalType,
    pub age: u32,
    pub diet: Diet,
    pub weight: f64,
    pub last_fed: Option<NaiveDate>,
    pub harvestable: bool,
    pub last_harvested: Option<NaiveDate>,
    /// Cumulative consumption — the backend includes these on some
    /// payloads only, so they are advisory.
    pub food_spent: Option<u32>,
    pub water_spent: Option<u32>,
}

impl TryFrom<LivestockRecord> for Livestock {
    type Error = ModelError;

    fn try_from(record: LivestockRecord) -> Result<Self, Self::Error> {
        let tag = TagId::new(record.tag_id)?;
        let animal_type = AnimalType::from_str(&record.animal_type)
            .map_err(|_| ModelError::UnknownAnimalType(record.animal_type.clone()))?;
        let diet = Diet::from_str(&record.diet)
            .map_err(|_| ModelError::UnknownDiet(record.diet.clone()))?;

        Ok(Self {
            tag,
            animal_type,
            age: record.age,
            diet,
            weight: record.weight,
            last_fed: record.last_fed,
            harvestable: record.harvestable,
            last_harvested: record.last_harvested,
            food_spent: record.food_spent,
            water_spent: record.water_spent,
        })
    }
}

impl From<&Livestock> for LivestockRecord {
    fn from(livestock: &Livestock) -> Self {
        Self {
            tag_id: livestock.tag.get(),
            animal_type: livestock.animal_type.to_string(),
            age: livestock.age,
            diet: livestock.diet.to_string(),
            weight: livestock.weight,
            last_fed: livestock.last_fed,
            harvestable: livestock.harvestable,
            last_harvested: livestock.last_harvested,
            food_spent: livestock.food_spent,
            water_spent: livestock.water_spent,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wire_record(tag_id: u32, animal_type: &str, diet: &str) -> LivestockRecord {
        LivestockRecord {
            tag_id,
            animal_type: animal_type.into(),
            age: 2,
            diet: diet.into(),
            weight: 80.0,
            last_fed: None,
            harvestable: false,
            last_harvested: None,
            food_spent: None,
            water_spent: None,
        }
    }

    #[test]
    fn tag_band_is_enforced() {
        assert!(TagId::new(4000).is_ok());
        assert!(TagId::new(4999).is_ok());
        assert_eq!(TagId::new(3999), Err(ModelError::TagOutOfBand(3999)));
        assert_eq!(TagId::new(5000), Err(ModelError::TagOutOfBand(5000)));
    }

    #[test]
    fn wire_conversion_round_trips() {
        let livestock = Livestock::try_from(wire_record(4321, "sheep", "wheat")).unwrap();
        assert_eq!(livestock.tag.get(), 4321);
        assert_eq!(livestock.animal_type, AnimalType::Sheep);
        assert_eq!(livestock.diet, Diet::Wheat);

        let back = LivestockRecord::from(&livestock);
        assert_eq!(back.tag_id, 4321);
        assert_eq!(back.animal_type, "sheep");
        assert_eq!(back.diet, "wheat");
    }

    #[test]
    fn unknown_category_fails_conversion() {
        let err = Livestock::try_from(wire_record(4001, "dragon", "wheat")).unwrap_err();
        assert_eq!(err, ModelError::UnknownAnimalType("dragon".into()));

        let err = Livestock::try_from(wire_record(4001, "cow", "gravel")).unwrap_err();
        assert_eq!(err, ModelError::UnknownDiet("gravel".into()));
    }
}
