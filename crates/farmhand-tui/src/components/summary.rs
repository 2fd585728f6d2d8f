//! Livestock summary — per-category herd counts and sync status.

use std::collections::BTreeMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use strum::IntoEnumIterator;

use farmhand_core::AnimalType;
use farmhand_core::store::LoadState;

use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct Summary {
    counts: Arc<BTreeMap<AnimalType, u64>>,
    load_state: LoadState,
}

impl Summary {
    pub fn new() -> Self {
        Self {
            counts: Arc::new(BTreeMap::new()),
            load_state: LoadState::default(),
        }
    }
}

impl Component for Summary {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CountsUpdated(counts) => self.counts = counts.clone(),
            Action::LoadStateChanged(state) => self.load_state = *state,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Livestock Summary ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let mut lines: Vec<Line> = AnimalType::iter()
            .map(|animal| {
                let count = self.counts.get(&animal).copied();
                Line::from(vec![
                    Span::styled(format!("  {:<10}", animal.label()), theme::label()),
                    Span::styled(
                        count.map_or_else(|| "?".into(), |c| c.to_string()),
                        theme::value(),
                    ),
                ])
            })
            .collect();

        let (state_label, state_style) = match self.load_state {
            LoadState::Uninitialized => ("not loaded", theme::label()),
            LoadState::Loading => ("syncing…", theme::border_focused()),
            LoadState::Loaded => ("in sync", theme::success()),
        };
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Status     ", theme::label()),
            Span::styled(state_label, state_style),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  R ", theme::key_hint_key()),
            Span::styled("refresh counts", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
