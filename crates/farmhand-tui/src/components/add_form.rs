//! Add-livestock form. Every field is required; submission composes a
//! validated record or surfaces what is wrong without issuing a request.

use chrono::NaiveDate;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator;

use farmhand_core::{AnimalType, Diet, Livestock, TagId};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddField {
    Tag,
    AnimalType,
    Diet,
    Age,
    Weight,
    LastFed,
    LastHarvested,
    Harvestable,
}

impl AddField {
    const ALL: [AddField; 8] = [
        Self::Tag,
        Self::AnimalType,
        Self::Diet,
        Self::Age,
        Self::Weight,
        Self::LastFed,
        Self::LastHarvested,
        Self::Harvestable,
    ];

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Self::Tag | Self::Age | Self::Weight | Self::LastFed | Self::LastHarvested
        )
    }
}

pub struct AddForm {
    focused: bool,
    active_field: AddField,
    tag: String,
    animal_type: AnimalType,
    diet: Diet,
    age: String,
    weight: String,
    last_fed: String,
    last_harvested: String,
    harvestable: bool,
}

impl AddForm {
    pub fn new() -> Self {
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        Self {
            focused: false,
            active_field: AddField::Tag,
            tag: TagId::MIN.to_string(),
            animal_type: AnimalType::Cow,
            diet: Diet::Canola,
            age: "1".into(),
            weight: "5".into(),
            last_fed: today.clone(),
            last_harvested: today,
            harvestable: false,
        }
    }

    /// Compose a validated record, or explain the first problem found.
    pub fn compose(&self) -> Result<Livestock, String> {
        let raw_tag: u32 = self
            .tag
            .trim()
            .parse()
            .map_err(|_| format!("tag must be a number, got '{}'", self.tag))?;
        let tag = TagId::new(raw_tag).map_err(|e| e.to_string())?;

        let age: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|_| format!("age must be a non-negative integer, got '{}'", self.age))?;

        let weight: f64 = self
            .weight
            .trim()
            .parse()
            .map_err(|_| format!("weight must be a number, got '{}'", self.weight))?;
        if weight <= 0.0 {
            return Err(format!("weight must be positive, got {weight}"));
        }

        let last_fed = parse_date("last fed", &self.last_fed)?;
        let last_harvested = parse_date("last harvested", &self.last_harvested)?;

        Ok(Livestock {
            tag,
            animal_type: self.animal_type,
            age,
            diet: self.diet,
            weight,
            last_fed: Some(last_fed),
            harvestable: self.harvestable,
            last_harvested: Some(last_harvested),
            food_spent: None,
            water_spent: None,
        })
    }

    fn active_buffer(&mut self) -> Option<&mut String> {
        match self.active_field {
            AddField::Tag => Some(&mut self.tag),
            AddField::Age => Some(&mut self.age),
            AddField::Weight => Some(&mut self.weight),
            AddField::LastFed => Some(&mut self.last_fed),
            AddField::LastHarvested => Some(&mut self.last_harvested),
            _ => None,
        }
    }

    fn cycle_selection(&mut self, forward: bool) {
        match self.active_field {
            AddField::AnimalType => {
                self.animal_type = cycle_enum(self.animal_type, AnimalType::iter(), forward);
            }
            AddField::Diet => {
                self.diet = cycle_enum(self.diet, Diet::iter(), forward);
            }
            AddField::Harvestable => self.harvestable = !self.harvestable,
            _ => {}
        }
    }

    fn field_row(&self, field: AddField, label: &str, value: String) -> Line<'static> {
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
            Span::styled(format!("{label:<14}"), theme::label()),
            Span::styled(value, value_style),
        ])
    }
}

fn parse_date(label: &str, raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{label} must be a YYYY-MM-DD date, got '{raw}'"))
}

fn cycle_enum<T: Copy + PartialEq>(
    current: T,
    variants: impl Iterator<Item = T>,
    forward: bool,
) -> T {
    let options: Vec<T> = variants.collect();
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    let len = options.len();
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    options[next]
}

impl Component for AddForm {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::FocusList)),
            KeyCode::Tab | KeyCode::Down => self.active_field = self.active_field.next(),
            KeyCode::BackTab | KeyCode::Up => self.active_field = self.active_field.prev(),
            KeyCode::Enter => {
                return match self.compose() {
                    Ok(livestock) => Ok(Some(Action::SubmitAdd(livestock))),
                    Err(reason) => Ok(Some(Action::Notify(Notification::error(reason)))),
                };
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
                    if c.is_ascii_digit() || c == '-' || c == '.' {
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

    fn render(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Add Livestock ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let lines = vec![
            self.field_row(AddField::Tag, "Tag ID", self.tag.clone()),
            self.field_row(
                AddField::AnimalType,
                "Animal",
                self.animal_type.label().to_owned(),
            ),
            self.field_row(AddField::Diet, "Diet", self.diet.label().to_owned()),
            self.field_row(AddField::Age, "Age", self.age.clone()),
            self.field_row(AddField::Weight, "Weight (kg)", self.weight.clone()),
            self.field_row(AddField::LastFed, "Last fed", self.last_fed.clone()),
            self.field_row(
                AddField::LastHarvested,
                "Last harvested",
                self.last_harvested.clone(),
            ),
            self.field_row(
                AddField::Harvestable,
                "Harvestable",
                if self.harvestable { "Yes" } else { "No" }.to_owned(),
            ),
            Line::from(vec![
                Span::styled("  Enter ", theme::key_hint_key()),
                Span::styled("add  ", theme::key_hint()),
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_form_composes_a_valid_record() {
        let form = AddForm::new();
        let livestock = form.compose().expect("default form should be valid");
        assert_eq!(livestock.tag.get(), TagId::MIN);
        assert_eq!(livestock.animal_type, AnimalType::Cow);
        assert!(livestock.last_fed.is_some());
    }

    #[test]
    fn out_of_band_tag_is_rejected() {
        let mut form = AddForm::new();
        form.tag = "1234".into();
        let err = form.compose().unwrap_err();
        assert!(err.contains("1234"), "message should name the tag: {err}");
    }

    #[test]
    fn malformed_fields_block_submission() {
        let mut form = AddForm::new();
        form.age = "old".into();
        assert!(form.compose().is_err());

        let mut form = AddForm::new();
        form.weight = "0".into();
        assert!(form.compose().is_err());

        let mut form = AddForm::new();
        form.last_fed = "yesterday".into();
        assert!(form.compose().is_err());
    }
}
