//! Livestock table — the display half of the panel.
//!
//! Shows the current snapshot with a detail pane for the selected
//! record and per-record action keys. Harvest is offered only for
//! harvestable records; the key is inert (and visibly dimmed) otherwise.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use chrono::NaiveDate;
use farmhand_core::{Livestock, Snapshot};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;

pub struct LivestockList {
    focused: bool,
    snapshot: Option<Snapshot>,
    table_state: TableState,
}

impl LivestockList {
    pub fn new() -> Self {
        Self {
            focused: false,
            snapshot: None,
            table_state: TableState::default(),
        }
    }

    fn records(&self) -> &[Arc<Livestock>] {
        self.snapshot.as_deref().map_or(&[], |snap| snap.as_slice())
    }

    pub fn selected(&self) -> Option<Arc<Livestock>> {
        let records = self.records();
        records.get(self.table_state.selected()?).cloned()
    }

    fn select(&mut self, idx: usize) {
        let len = self.records().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.records().len();
        if len == 0 {
            return;
        }
        #[allow(clippy::cast_possible_wrap)]
        let current = self.table_state.selected().unwrap_or(0) as isize;
        #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.select(next);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, livestock: &Livestock) {
        let title = format!(
            " {} #{}  ·  {} yrs  ·  {:.1} kg ",
            livestock.animal_type.label(),
            livestock.tag,
            livestock.age,
            livestock.weight,
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let detail_layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        let lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Diet           ", theme::label()),
                Span::styled(livestock.diet.label(), theme::value()),
                Span::styled("       Last fed       ", theme::label()),
                Span::styled(fmt_date(livestock.last_fed), theme::value()),
            ]),
            Line::from(vec![
                Span::styled("  Harvestable    ", theme::label()),
                Span::styled(
                    if livestock.harvestable { "yes" } else { "no" },
                    if livestock.harvestable {
                        theme::success()
                    } else {
                        theme::value()
                    },
                ),
                Span::styled("       Last harvested ", theme::label()),
                Span::styled(fmt_date(livestock.last_harvested), theme::value()),
            ]),
            Line::from(vec![
                Span::styled("  Food spent     ", theme::label()),
                Span::styled(fmt_opt(livestock.food_spent), theme::value()),
                Span::styled("       Water spent    ", theme::label()),
                Span::styled(fmt_opt(livestock.water_spent), theme::value()),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), detail_layout[0]);

        let harvest_style = if livestock.harvestable {
            theme::key_hint_key()
        } else {
            theme::disabled()
        };
        let hints = Line::from(vec![
            Span::styled("  f ", theme::key_hint_key()),
            Span::styled("feed  ", theme::key_hint()),
            Span::styled("h ", harvest_style),
            Span::styled("harvest  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("resources  ", theme::key_hint()),
            Span::styled("v ", theme::key_hint_key()),
            Span::styled("vet records  ", theme::key_hint()),
            Span::styled("t ", theme::key_hint_key()),
            Span::styled("terminate", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), detail_layout[1]);
    }
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "—".into(), |d| d.format("%Y-%m-%d").to_string())
}

fn fmt_opt(value: Option<u32>) -> String {
    value.map_or_else(|| "—".into(), |v| v.to_string())
}

impl Component for LivestockList {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),

            KeyCode::Char('f') => {
                if let Some(livestock) = self.selected() {
                    return Ok(Some(Action::RequestFeed(livestock.tag)));
                }
            }
            KeyCode::Char('h') => {
                if let Some(livestock) = self.selected() {
                    // UI-level guard: a non-harvestable record never
                    // produces a request. The backend stays the
                    // authority for the ones that do go out.
                    if livestock.harvestable {
                        return Ok(Some(Action::RequestHarvest(livestock.tag)));
                    }
                    return Ok(Some(Action::Notify(Notification::info(format!(
                        "Cannot harvest #{} yet",
                        livestock.tag
                    )))));
                }
            }
            KeyCode::Char('r') => {
                if let Some(livestock) = self.selected() {
                    return Ok(Some(Action::RequestResourceReport(livestock.tag)));
                }
            }
            KeyCode::Char('v') => {
                if let Some(livestock) = self.selected() {
                    return Ok(Some(Action::RequestVetReport(livestock.tag)));
                }
            }
            KeyCode::Char('t') | KeyCode::Delete => {
                if let Some(livestock) = self.selected() {
                    return Ok(Some(Action::RequestTerminate(livestock.tag)));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::LivestockUpdated(snapshot) = action {
            self.snapshot = snapshot.clone();
            let len = self.records().len();
            match self.table_state.selected() {
                Some(idx) if len > 0 => self.select(idx),
                _ if len > 0 => self.select(0),
                _ => self.table_state.select(None),
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [table_area, detail_area] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(7)]).areas(area);

        let border = if self.focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let title = match &self.snapshot {
            None => " Livestock (loading…) ".to_owned(),
            Some(snap) => format!(" Livestock ({} displayed) ", snap.len()),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);

        let header = Row::new(vec![
            Cell::from("Tag"),
            Cell::from("Type"),
            Cell::from("Age"),
            Cell::from("Weight"),
            Cell::from("Diet"),
            Cell::from("Last fed"),
            Cell::from("Harv"),
        ])
        .style(theme::table_header());

        let rows = self.records().iter().map(|l| {
            Row::new(vec![
                Cell::from(format!("#{}", l.tag)),
                Cell::from(l.animal_type.label()),
                Cell::from(l.age.to_string()),
                Cell::from(format!("{:.1}", l.weight)),
                Cell::from(l.diet.label()),
                Cell::from(fmt_date(l.last_fed)),
                Cell::from(if l.harvestable { "yes" } else { "no" }),
            ])
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(4),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::selected_row())
            .block(block);

        let mut table_state = self.table_state.clone();
        frame.render_widget(ratatui::widgets::Clear, table_area);
        frame.render_stateful_widget(table, table_area, &mut table_state);

        if let Some(livestock) = self.selected() {
            self.render_detail(frame, detail_area, &livestock);
        } else {
            let empty = Paragraph::new(Line::styled(
                "  No livestock to display.",
                theme::label(),
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(theme::border_default()),
            );
            frame.render_widget(empty, detail_area);
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
