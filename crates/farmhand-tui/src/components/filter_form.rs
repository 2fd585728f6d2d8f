//! Filter form — edits the per-field livestock constraints.
//!
//! Buffers are free text; composition happens on apply, where junk
//! input coerces to the neutral sentinel rather than reaching a query.
//! Clearing resets every buffer and is followed by an immediate
//! unfiltered re-fetch upstream.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator;

use farmhand_core::filter::{AgeRange, FilterCriteria, TagRange, UNSET, parse_bound, parse_tag_bound};
use farmhand_core::{AnimalType, Diet, TagId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

/// Which constraint field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    TagMin,
    TagMax,
    AnimalType,
    Diet,
    Harvestable,
    AgeMin,
    AgeMax,
    MinFood,
    MinWater,
}

impl FilterField {
    const ALL: [FilterField; 9] = [
        Self::TagMin,
        Self::TagMax,
        Self::AnimalType,
        Self::Diet,
        Self::Harvestable,
        Self::AgeMin,
        Self::AgeMax,
        Self::MinFood,
        Self::MinWater,
    ];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Free-text numeric fields accept typed digits.
    fn is_text(self) -> bool {
        matches!(
            self,
            Self::TagMin | Self::TagMax | Self::AgeMin | Self::AgeMax | Self::MinFood | Self::MinWater
        )
    }
}

pub struct FilterForm {
    focused: bool,
    active_field: FilterField,
    tag_min: String,
    tag_max: String,
    animal_type: Option<AnimalType>,
    diet: Option<Diet>,
    harvestable: Option<bool>,
    age_min: String,
    age_max: String,
    min_food: String,
    min_water: String,
}

impl FilterForm {
    pub fn new() -> Self {
        Self {
            focused: false,
            active_field: FilterField::TagMin,
            tag_min: TagId::MIN.to_string(),
            tag_max: TagId::MAX.to_string(),
            animal_type: None,
            diet: None,
            harvestable: None,
            age_min: String::new(),
            age_max: String::new(),
            min_food: String::new(),
            min_water: String::new(),
        }
    }

    /// Compose the criteria from the current buffers. Non-numeric text
    /// reverts to the sentinel (age/consumption) or the band edge (tags).
    pub fn compose(&self) -> FilterCriteria {
        FilterCriteria {
            tag_range: TagRange {
                min: parse_tag_bound(&self.tag_min, TagId::MIN),
                max: parse_tag_bound(&self.tag_max, TagId::MAX),
            },
            animal_type: self.animal_type,
            diet: self.diet,
            harvestable: self.harvestable,
            age_range: AgeRange {
                min: parse_bound(&self.age_min),
                max: parse_bound(&self.age_max),
            },
            min_food_spent: parse_bound(&self.min_food),
            min_water_spent: parse_bound(&self.min_water),
        }
    }

    /// Rewrite the buffers from the composed criteria so coercion of
    /// junk input is immediately visible.
    fn normalize(&mut self) {
        let criteria = self.compose();
        self.tag_min = criteria.tag_range.min.to_string();
        self.tag_max = criteria.tag_range.max.to_string();
        self.age_min = unset_to_blank(criteria.age_range.min);
        self.age_max = unset_to_blank(criteria.age_range.max);
        self.min_food = unset_to_blank(criteria.min_food_spent);
        self.min_water = unset_to_blank(criteria.min_water_spent);
    }

    /// Reset every buffer to the neutral criteria.
    pub fn reset(&mut self) {
        *self = Self {
            focused: self.focused,
            ..Self::new()
        };
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.active_field {
            FilterField::TagMin => Some(&mut self.tag_min),
            FilterField::TagMax => Some(&mut self.tag_max),
            FilterField::AgeMin => Some(&mut self.age_min),
            FilterField::AgeMax => Some(&mut self.age_max),
            FilterField::MinFood => Some(&mut self.min_food),
            FilterField::MinWater => Some(&mut self.min_water),
            _ => None,
        }
    }

    fn cycle_selection(&mut self, forward: bool) {
        match self.active_field {
            FilterField::AnimalType => {
                self.animal_type = cycle_option(self.animal_type, AnimalType::iter(), forward);
            }
            FilterField::Diet => {
                self.diet = cycle_option(self.diet, Diet::iter(), forward);
            }
            FilterField::Harvestable => {
                self.harvestable = match (self.harvestable, forward) {
                    (None, true) | (Some(false), false) => Some(true),
                    (Some(true), true) | (None, false) => Some(false),
                    (Some(false), true) | (Some(true), false) => None,
                };
            }
            _ => {}
        }
    }

    fn field_row(&self, field: FilterField, label: &str, value: String) -> Line<'static> {
        let marker = if self.focused && field == self.active_field {
            Span::styled("▸ ", theme::border_focused())
        } else {
            Span::raw("  ")
        };
        let value_style = if self.focused && field == self.active_field {
            theme::border_focused()
        } else {
            theme::value()
        };
        Line::from(vec![
            marker,
            Span::styled(format!("{label:<12}"), theme::label()),
            Span::styled(value, value_style),
        ])
    }
}

fn unset_to_blank(value: i32) -> String {
    if value == UNSET {
        String::new()
    } else {
        value.to_string()
    }
}

/// Cycle through `None` followed by every variant of an enum.
fn cycle_option<T: Copy + PartialEq>(
    current: Option<T>,
    variants: impl Iterator<Item = T>,
    forward: bool,
) -> Option<T> {
    let mut options: Vec<Option<T>> = vec![None];
    options.extend(variants.map(Some));
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    let len = options.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    options[next]
}

fn option_label<T: Copy>(value: Option<T>, label: impl Fn(T) -> &'static str) -> String {
    value.map_or_else(|| "All".to_owned(), |v| label(v).to_owned())
}

fn tri_state_label(value: Option<bool>) -> String {
    match value {
        None => "All".into(),
        Some(true) => "Yes".into(),
        Some(false) => "No".into(),
    }
}

impl Component for FilterForm {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::FocusList)),
            KeyCode::Tab | KeyCode::Down => self.active_field = self.active_field.next(),
            KeyCode::BackTab | KeyCode::Up => self.active_field = self.active_field.prev(),
            KeyCode::Enter => {
                self.normalize();
                return Ok(Some(Action::ApplyFilters(self.compose())));
            }
            KeyCode::Left => self.cycle_selection(false),
            KeyCode::Right => self.cycle_selection(true),
            KeyCode::Backspace => {
                if let Some(buffer) = self.active_buffer() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if self.active_field.is_text() {
                    if c.is_ascii_digit() {
                        if let Some(buffer) = self.active_buffer() {
                            buffer.push(c);
                        }
                    }
                } else {
                    self.cycle_selection(true);
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ClearFilters = action {
            self.reset();
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Filter Livestock ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let lines = vec![
            self.field_row(FilterField::TagMin, "Tag from", self.tag_min.clone()),
            self.field_row(FilterField::TagMax, "Tag to", self.tag_max.clone()),
            self.field_row(
                FilterField::AnimalType,
                "Animal",
                option_label(self.animal_type, AnimalType::label),
            ),
            self.field_row(FilterField::Diet, "Diet", option_label(self.diet, Diet::label)),
            self.field_row(
                FilterField::Harvestable,
                "Harvestable",
                tri_state_label(self.harvestable),
            ),
            self.field_row(FilterField::AgeMin, "Age from", self.age_min.clone()),
            self.field_row(FilterField::AgeMax, "Age to", self.age_max.clone()),
            self.field_row(FilterField::MinFood, "Min food", self.min_food.clone()),
            self.field_row(FilterField::MinWater, "Min water", self.min_water.clone()),
            Line::from(vec![
                Span::styled("  Enter ", theme::key_hint_key()),
                Span::styled("apply  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("back", theme::key_hint()),
            ]),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
