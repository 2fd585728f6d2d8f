// ── Filter composition ──
//
// Holds per-field livestock constraints and reduces them to a single
// query decision. The two load-bearing functions — `is_empty` and
// `resolve` — are pure and total: emptiness depends only on the criteria
// contents, never on whether the panel is enabled, and the decision
// logic lives nowhere near an event handler.

use serde::{Deserialize, Serialize};

use farmhand_api::types::{Bounds, CategorySelector, LivestockQuery, TriState};

use crate::model::{AnimalType, Diet, TagId};

/// Sentinel for "not set" on the signed numeric constraint fields.
pub const UNSET: i32 = -1;

// ── Ranges ──────────────────────────────────────────────────────────

/// Tag constraint: inclusive bounds inside the ear-tag band.
/// Neutral when it spans the whole band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRange {
    pub min: u32,
    pub max: u32,
}

impl TagRange {
    pub fn is_neutral(self) -> bool {
        self.min == TagId::MIN && self.max == TagId::MAX
    }
}

impl Default for TagRange {
    fn default() -> Self {
        Self {
            min: TagId::MIN,
            max: TagId::MAX,
        }
    }
}

/// Age constraint: inclusive bounds, `-1` on both ends when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: i32,
    pub max: i32,
}

impl AgeRange {
    pub fn is_neutral(self) -> bool {
        self.min == UNSET && self.max == UNSET
    }
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min: UNSET,
            max: UNSET,
        }
    }
}

// ── Criteria ────────────────────────────────────────────────────────

/// The full set of independently-editable livestock constraints.
///
/// `Default` is the documented neutral criteria: tag range spanning the
/// whole band, age range `[-1, -1]`, no category or tri-state
/// selection, consumption minima `-1`. No cross-field validation is
/// performed at write time — `min > max` is stored as-is and simply
/// yields zero results downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub tag_range: TagRange,
    pub animal_type: Option<AnimalType>,
    pub diet: Option<Diet>,
    pub harvestable: Option<bool>,
    pub age_range: AgeRange,
    pub min_food_spent: i32,
    pub min_water_spent: i32,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            tag_range: TagRange::default(),
            animal_type: None,
            diet: None,
            harvestable: None,
            age_range: AgeRange::default(),
            min_food_spent: UNSET,
            min_water_spent: UNSET,
        }
    }
}

impl FilterCriteria {
    /// The neutral criteria — every field at its sentinel.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// True iff every field holds its neutral value.
    ///
    /// This predicate is the sole gate between "fetch all" and
    /// "fetch filtered".
    pub fn is_empty(&self) -> bool {
        self.tag_range.is_neutral()
            && self.animal_type.is_none()
            && self.diet.is_none()
            && self.harvestable.is_none()
            && self.age_range.is_neutral()
            && self.min_food_spent == UNSET
            && self.min_water_spent == UNSET
    }

    /// Wire shape for `POST /api/livestock/filter`.
    pub fn to_query(&self) -> LivestockQuery {
        #[allow(clippy::cast_possible_wrap)]
        let tag_id = Bounds {
            min: self.tag_range.min as i32,
            max: self.tag_range.max as i32,
        };
        LivestockQuery {
            tag_id,
            animal_type: self
                .animal_type
                .map_or(CategorySelector::All, |a| CategorySelector::Only(a.to_string())),
            age: Bounds {
                min: self.age_range.min,
                max: self.age_range.max,
            },
            diet: self
                .diet
                .map_or(CategorySelector::All, |d| CategorySelector::Only(d.to_string())),
            harvestable: match self.harvestable {
                None => TriState::All,
                Some(true) => TriState::Yes,
                Some(false) => TriState::No,
            },
            min_food_spent: self.min_food_spent,
            min_water_spent: self.min_water_spent,
        }
    }
}

// ── Query decision ──────────────────────────────────────────────────

/// What the sync controller should ask the backend for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    FetchAll,
    FetchFiltered(FilterCriteria),
}

/// Reduce panel state to a single query decision.
///
/// `FetchAll` when the caller overrides, when the filter panel is not
/// enabled, or when the criteria are neutral; otherwise the criteria
/// pass through unmodified. Disabling the panel does not clear stored
/// criteria — re-enabling restores the prior selection — but a disabled
/// panel always forces an unfiltered query.
pub fn resolve(enabled: bool, criteria: &FilterCriteria, override_all: bool) -> QueryMode {
    if override_all || !enabled || criteria.is_empty() {
        QueryMode::FetchAll
    } else {
        QueryMode::FetchFiltered(criteria.clone())
    }
}

// ── Editable panel state ────────────────────────────────────────────

/// The filter panel: an enabled flag plus the stored criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPanel {
    pub enabled: bool,
    criteria: FilterCriteria,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self {
            enabled: false,
            criteria: FilterCriteria::neutral(),
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Reset every field to its neutral value and disable the panel.
    /// The caller follows up with an immediate unfiltered re-fetch so
    /// clearing is always observable.
    pub fn clear(&mut self) {
        self.criteria = FilterCriteria::neutral();
        self.enabled = false;
    }

    /// The query decision for the current panel state.
    pub fn resolve(&self, override_all: bool) -> QueryMode {
        resolve(self.enabled, &self.criteria, override_all)
    }
}

// ── Free-text parsing ───────────────────────────────────────────────
//
// Constraint inputs arrive as free text. Anything that does not parse
// as a usable number reverts to the sentinel / fallback — NaN and
// garbage never reach a query.

/// Parse an age or consumption bound; non-numeric or negative input
/// becomes [`UNSET`].
pub fn parse_bound(raw: &str) -> i32 {
    match raw.trim().parse::<i32>() {
        Ok(n) if n >= 0 => n,
        _ => UNSET,
    }
}

/// Parse a tag bound; non-numeric input falls back to the given band
/// edge, and in-range values pass through unchanged.
pub fn parse_tag_bound(raw: &str, fallback: u32) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every single-field departure from neutral, for permutation tests.
    fn single_field_mutations() -> Vec<(&'static str, FilterCriteria)> {
        let neutral = FilterCriteria::neutral();
        let mut cases = Vec::new();

        let mut c = neutral.clone();
        c.tag_range.min = 4100;
        cases.push(("tag min", c));

        let mut c = neutral.clone();
        c.tag_range.max = 4500;
        cases.push(("tag max", c));

        let mut c = neutral.clone();
        c.animal_type = Some(AnimalType::Pig);
        cases.push(("animal type", c));

        let mut c = neutral.clone();
        c.diet = Some(Diet::Corn);
        cases.push(("diet", c));

        let mut c = neutral.clone();
        c.harvestable = Some(false);
        cases.push(("harvestable", c));

        let mut c = neutral.clone();
        c.age_range.min = 0;
        cases.push(("age min", c));

        let mut c = neutral.clone();
        c.age_range.max = 10;
        cases.push(("age max", c));

        let mut c = neutral.clone();
        c.min_food_spent = 0;
        cases.push(("food spent", c));

        let mut c = neutral.clone();
        c.min_water_spent = 100;
        cases.push(("water spent", c));

        cases
    }

    #[test]
    fn neutral_criteria_are_empty() {
        assert!(FilterCriteria::neutral().is_empty());
        assert_eq!(FilterCriteria::neutral(), FilterCriteria::neutral());
    }

    #[test]
    fn any_single_field_departure_is_nonempty() {
        for (name, criteria) in single_field_mutations() {
            assert!(!criteria.is_empty(), "{name} should make criteria non-empty");
        }
    }

    #[test]
    fn emptiness_holds_under_field_permutation() {
        // Build the same non-neutral criteria by writing fields in two
        // different orders — emptiness depends only on the final contents.
        let mut forward = FilterCriteria::neutral();
        forward.animal_type = Some(AnimalType::Cow);
        forward.age_range.min = 1;
        forward.min_water_spent = 20;

        let mut backward = FilterCriteria::neutral();
        backward.min_water_spent = 20;
        backward.age_range.min = 1;
        backward.animal_type = Some(AnimalType::Cow);

        assert_eq!(forward, backward);
        assert!(!forward.is_empty());

        // Unsetting every field, in any order, restores emptiness.
        backward.animal_type = None;
        backward.min_water_spent = UNSET;
        backward.age_range.min = UNSET;
        assert!(backward.is_empty());
    }

    #[test]
    fn disabled_panel_always_fetches_all() {
        let mut criteria = FilterCriteria::neutral();
        criteria.animal_type = Some(AnimalType::Cow);
        criteria.harvestable = Some(true);

        assert_eq!(resolve(false, &criteria, false), QueryMode::FetchAll);
    }

    #[test]
    fn enabled_empty_criteria_fetch_all() {
        assert_eq!(
            resolve(true, &FilterCriteria::neutral(), false),
            QueryMode::FetchAll
        );
    }

    #[test]
    fn override_beats_enabled_nonempty_criteria() {
        let mut criteria = FilterCriteria::neutral();
        criteria.diet = Some(Diet::Wheat);

        assert_eq!(resolve(true, &criteria, true), QueryMode::FetchAll);
    }

    #[test]
    fn enabled_nonempty_criteria_pass_through_unmodified() {
        let mut criteria = FilterCriteria::neutral();
        criteria.tag_range = TagRange {
            min: 4200,
            max: 4300,
        };
        criteria.min_water_spent = 50;

        match resolve(true, &criteria, false) {
            QueryMode::FetchFiltered(resolved) => assert_eq!(resolved, criteria),
            QueryMode::FetchAll => panic!("expected FetchFiltered"),
        }
    }

    #[test]
    fn clear_restores_neutral_defaults_and_disables() {
        let mut panel = FilterPanel::new();
        panel.enabled = true;
        panel.criteria_mut().animal_type = Some(AnimalType::Sheep);
        panel.criteria_mut().age_range = AgeRange { min: 2, max: 8 };
        panel.criteria_mut().tag_range = TagRange {
            min: 4100,
            max: 4101,
        };

        panel.clear();

        assert!(!panel.enabled);
        assert_eq!(*panel.criteria(), FilterCriteria::neutral());
        assert_eq!(panel.criteria().tag_range.min, 4000);
        assert_eq!(panel.criteria().tag_range.max, 4999);
        assert_eq!(panel.criteria().age_range.min, UNSET);
        assert_eq!(panel.criteria().min_food_spent, UNSET);
        assert_eq!(panel.resolve(false), QueryMode::FetchAll);
    }

    #[test]
    fn min_greater_than_max_is_stored_as_is() {
        let mut panel = FilterPanel::new();
        panel.enabled = true;
        panel.criteria_mut().age_range = AgeRange { min: 9, max: 2 };

        // No write-time validation — the backend answers with zero rows.
        match panel.resolve(false) {
            QueryMode::FetchFiltered(criteria) => {
                assert_eq!(criteria.age_range, AgeRange { min: 9, max: 2 });
            }
            QueryMode::FetchAll => panic!("expected FetchFiltered"),
        }
    }

    #[test]
    fn junk_input_reverts_to_sentinel() {
        assert_eq!(parse_bound("7"), 7);
        assert_eq!(parse_bound(" 12 "), 12);
        assert_eq!(parse_bound(""), UNSET);
        assert_eq!(parse_bound("abc"), UNSET);
        assert_eq!(parse_bound("-3"), UNSET);
        assert_eq!(parse_bound("1.5"), UNSET);

        assert_eq!(parse_tag_bound("4321", TagId::MIN), 4321);
        assert_eq!(parse_tag_bound("oops", TagId::MIN), TagId::MIN);
        assert_eq!(parse_tag_bound("", TagId::MAX), TagId::MAX);
    }

    #[test]
    fn wire_query_uses_sentinel_shape() {
        let mut criteria = FilterCriteria::neutral();
        criteria.animal_type = Some(AnimalType::Chicken);
        criteria.harvestable = Some(true);

        let query = criteria.to_query();
        assert_eq!(query.tag_id, Bounds { min: 4000, max: 4999 });
        assert_eq!(query.animal_type, CategorySelector::Only("chicken".into()));
        assert_eq!(query.diet, CategorySelector::All);
        assert_eq!(query.harvestable, TriState::Yes);
        assert_eq!(query.age, Bounds { min: -1, max: -1 });
        assert_eq!(query.min_food_spent, UNSET);
    }
}
