//! Application core — event loop, focus management, action dispatch.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use farmhand_core::store::LoadState;
use farmhand_core::{Panel, TagId};

use crate::action::{Action, ConfirmAction, ModalContent, Notification};
use crate::component::Component;
use crate::components::add_form::AddForm;
use crate::components::filter_form::FilterForm;
use crate::components::livestock_list::LivestockList;
use crate::components::summary::Summary;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::overlay;

/// Which pane owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Focus {
    #[default]
    List,
    FilterForm,
    AddForm,
}

/// Top-level application state and event loop.
pub struct App {
    /// Whether the app should keep running.
    running: bool,
    panel: Panel,
    focus: Focus,
    filter_visible: bool,
    add_visible: bool,
    list: LivestockList,
    filter_form: FilterForm,
    add_form: AddForm,
    summary: Summary,
    load_state: LoadState,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Single active modal presentation — a new one replaces it.
    modal: Option<ModalContent>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    /// Action sender — components and tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancellation token for the data bridge task.
    data_cancel: CancellationToken,
}

impl App {
    pub fn new(panel: Panel) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            running: true,
            panel,
            focus: Focus::default(),
            filter_visible: false,
            add_visible: false,
            list: LivestockList::new(),
            filter_form: FilterForm::new(),
            add_form: AddForm::new(),
            summary: Summary::new(),
            load_state: LoadState::default(),
            pending_confirm: None,
            modal: None,
            notification: None,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        self.list.init(self.action_tx.clone())?;
        self.filter_form.init(self.action_tx.clone())?;
        self.add_form.init(self.action_tx.clone())?;
        self.summary.init(self.action_tx.clone())?;
        self.list.set_focused(true);

        // Spawn the data bridge
        {
            let panel = self.panel.clone();
            let tx = self.action_tx.clone();
            let cancel = self.data_cancel.clone();
            tokio::spawn(async move {
                crate::data_bridge::spawn_data_bridge(panel, tx, cancel).await;
            });
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Cancel the data bridge and clean up
        self.data_cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Overlays capture input first;
    /// otherwise keys are routed to the focused pane.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Ctrl+C always quits
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Modal overlay: any dismissal key closes it, everything else
        // is swallowed — the acknowledgment is blocking.
        if self.modal.is_some() {
            return match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                    Ok(Some(Action::CloseModal))
                }
                _ => Ok(None),
            };
        }

        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        match self.focus {
            Focus::FilterForm => self.filter_form.handle_key_event(key),
            Focus::AddForm => self.add_form.handle_key_event(key),
            Focus::List => {
                // Global keys while the list is focused
                match key.code {
                    KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                    KeyCode::Char('s') => return Ok(Some(Action::RequestSync)),
                    KeyCode::Char('F') | KeyCode::Char('/') => {
                        return Ok(Some(Action::ToggleFilterForm));
                    }
                    KeyCode::Char('a') => return Ok(Some(Action::ToggleAddForm)),
                    KeyCode::Char('c') => return Ok(Some(Action::ClearFilters)),
                    KeyCode::Char('R') => return Ok(Some(Action::RefreshCounts)),
                    _ => {}
                }
                self.list.handle_key_event(key)
            }
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.list.set_focused(focus == Focus::List);
        self.filter_form.set_focused(focus == Focus::FilterForm);
        self.add_form.set_focused(focus == Focus::AddForm);
    }

    /// Process a single action — update app state and propagate to components.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                // Auto-dismiss notifications after 3 seconds
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
            }

            // ── Data events ────────────────────────────────────────
            Action::LivestockUpdated(_) | Action::CountsUpdated(_) => {
                self.list.update(action)?;
                self.summary.update(action)?;
            }
            Action::LoadStateChanged(state) => {
                self.load_state = *state;
                self.summary.update(action)?;
            }

            // ── Sync & filter ──────────────────────────────────────
            Action::RequestSync => self.spawn_sync(),
            Action::ApplyFilters(criteria) => {
                let criteria = criteria.clone();
                let panel = self.panel.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    panel
                        .edit_filter(|filter| {
                            filter.enabled = true;
                            *filter.criteria_mut() = criteria;
                        })
                        .await;
                    if let Err(e) = panel.sync(false).await {
                        let _ = tx.send(Action::ShowModal(ModalContent::failure(
                            "Filtered fetch failed",
                            &e,
                        )));
                    }
                });
            }
            Action::ClearFilters => {
                self.filter_form.update(action)?;
                self.filter_visible = false;
                self.set_focus(Focus::List);
                let panel = self.panel.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = panel.clear_filters().await {
                        let _ = tx.send(Action::ShowModal(ModalContent::failure(
                            "Re-fetch after clearing filters failed",
                            &e,
                        )));
                    }
                });
            }
            Action::ToggleFilterForm => {
                self.filter_visible = !self.filter_visible;
                let enabled = self.filter_visible;
                self.set_focus(if enabled { Focus::FilterForm } else { Focus::List });
                // The visibility flag *is* the filter-enabled flag:
                // hiding the form forces unfiltered queries while the
                // stored criteria survive for the next toggle.
                let panel = self.panel.clone();
                tokio::spawn(async move {
                    panel.edit_filter(|filter| filter.enabled = enabled).await;
                });
            }
            Action::ToggleAddForm => {
                self.add_visible = !self.add_visible;
                let focus = if self.add_visible {
                    Focus::AddForm
                } else {
                    Focus::List
                };
                self.set_focus(focus);
            }

            // ── Mutations ──────────────────────────────────────────
            Action::SubmitAdd(livestock) => {
                let livestock = livestock.clone();
                let panel = self.panel.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let tag = livestock.tag;
                    match panel.insert(livestock).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Livestock #{tag} added to the herd"
                            ))));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::ShowModal(ModalContent::failure(
                                format!("Failed to add livestock #{tag}"),
                                &e,
                            )));
                        }
                    }
                });
            }
            Action::RequestFeed(tag) => {
                let tag = *tag;
                let panel = self.panel.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match panel.feed(tag).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Fed livestock #{tag}"
                            ))));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::ShowModal(ModalContent::failure(
                                format!("Failed to feed livestock #{tag}"),
                                &e,
                            )));
                        }
                    }
                });
            }
            Action::RequestHarvest(tag) => {
                let tag = *tag;
                let panel = self.panel.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    match panel.harvest(tag).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Notify(Notification::success(format!(
                                "Harvested from livestock #{tag}"
                            ))));
                        }
                        Err(e) => {
                            let _ = tx.send(Action::ShowModal(ModalContent::failure(
                                format!("Failed to harvest livestock #{tag}"),
                                &e,
                            )));
                        }
                    }
                });
            }
            Action::RequestTerminate(tag) => {
                if let Some(livestock) = self.panel.store().find(*tag) {
                    self.pending_confirm = Some(ConfirmAction::Terminate {
                        tag: *tag,
                        animal: livestock.animal_type,
                    });
                }
            }
            Action::RefreshCounts => {
                let panel = self.panel.clone();
                tokio::spawn(async move {
                    panel.refresh_counts().await;
                });
            }

            // ── Reports ────────────────────────────────────────────
            Action::RequestResourceReport(tag) => self.spawn_resource_report(*tag),
            Action::RequestVetReport(tag) => self.spawn_vet_report(*tag),

            // ── Confirm dialog ─────────────────────────────────────
            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    match confirm {
                        ConfirmAction::Terminate { tag, .. } => {
                            let panel = self.panel.clone();
                            let tx = self.action_tx.clone();
                            tokio::spawn(async move {
                                match panel.terminate(tag).await {
                                    Ok(()) => {
                                        let _ = tx.send(Action::Notify(Notification::success(
                                            format!("Terminated livestock #{tag}"),
                                        )));
                                    }
                                    Err(e) => {
                                        let _ = tx.send(Action::ShowModal(
                                            ModalContent::failure(
                                                format!("Failed to terminate livestock #{tag}"),
                                                &e,
                                            ),
                                        ));
                                    }
                                }
                            });
                        }
                    }
                }
            }
            Action::ConfirmNo => {
                // Explicit cancel: no request is issued, nothing changes.
                self.pending_confirm = None;
            }

            // ── Modal overlay ──────────────────────────────────────
            Action::ShowModal(content) => {
                self.modal = Some(content.clone());
            }
            Action::CloseModal => {
                self.modal = None;
            }

            Action::FocusList => self.set_focus(Focus::List),

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
        }

        Ok(())
    }

    fn spawn_sync(&self) {
        let panel = self.panel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = panel.sync(false).await {
                let _ = tx.send(Action::ShowModal(ModalContent::failure("Sync failed", &e)));
            }
        });
    }

    fn spawn_resource_report(&self, tag: TagId) {
        let Some(livestock) = self.panel.store().find(tag) else {
            return;
        };
        let animal = livestock.animal_type;
        let panel = self.panel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match panel.resource_report(tag).await {
                Ok(totals) => {
                    let _ = tx.send(Action::ShowModal(ModalContent::Resources {
                        tag,
                        animal,
                        totals,
                    }));
                }
                Err(e) => {
                    let _ = tx.send(Action::ShowModal(ModalContent::failure(
                        format!("Failed to load resources for #{tag}"),
                        &e,
                    )));
                }
            }
        });
    }

    fn spawn_vet_report(&self, tag: TagId) {
        let Some(livestock) = self.panel.store().find(tag) else {
            return;
        };
        let animal = livestock.animal_type;
        let panel = self.panel.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match panel.vet_report(tag).await {
                Ok(record) => {
                    let _ = tx.send(Action::ShowModal(ModalContent::VetHistory {
                        tag,
                        animal,
                        record,
                    }));
                }
                Err(e) => {
                    let _ = tx.send(Action::ShowModal(ModalContent::failure(
                        format!("Failed to load vet records for #{tag}"),
                        &e,
                    )));
                }
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let full_area = frame.area();
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(full_area);

        self.render_header(frame, header_area);

        let [control_area, display_area] =
            Layout::horizontal([Constraint::Length(36), Constraint::Min(40)]).areas(body_area);

        // Control column: filter form / add form / summary, top to bottom
        let mut constraints = Vec::new();
        if self.filter_visible {
            constraints.push(Constraint::Length(12));
        }
        if self.add_visible {
            constraints.push(Constraint::Length(11));
        }
        constraints.push(Constraint::Min(9));
        let control_chunks = Layout::vertical(constraints).split(control_area);

        let mut chunk = 0;
        if self.filter_visible {
            self.filter_form.render(frame, control_chunks[chunk]);
            chunk += 1;
        }
        if self.add_visible {
            self.add_form.render(frame, control_chunks[chunk]);
            chunk += 1;
        }
        self.summary.render(frame, control_chunks[chunk]);

        self.list.render(frame, display_area);

        self.render_footer(frame, footer_area);

        // Overlays — notification under the dialogs, modal on top
        if let Some((notification, _)) = &self.notification {
            overlay::render_notification(frame, full_area, notification);
        }
        if let Some(confirm) = &self.pending_confirm {
            overlay::render_confirm(frame, full_area, confirm);
        }
        if let Some(modal) = &self.modal {
            overlay::render_modal(frame, full_area, modal);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let state = match self.load_state {
            LoadState::Uninitialized => Span::styled("● not loaded", theme::label()),
            LoadState::Loading => Span::styled("● syncing", theme::border_focused()),
            LoadState::Loaded => Span::styled("● in sync", theme::success()),
        };
        let line = Line::from(vec![
            Span::styled(" FARMHAND ", theme::title_style()),
            Span::styled("· nurture livestock   ", theme::label()),
            state,
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::NONE)),
            area,
        );
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.focus {
            Focus::List => vec![
                ("s", "sync"),
                ("F", "filter"),
                ("a", "add"),
                ("c", "clear filters"),
                ("R", "counts"),
                ("q", "quit"),
            ],
            Focus::FilterForm | Focus::AddForm => vec![
                ("Tab", "next field"),
                ("←/→", "change"),
                ("Enter", "submit"),
                ("Esc", "back"),
            ],
        };

        let mut spans = Vec::new();
        for (key, desc) in hints {
            spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
            spans.push(Span::styled(format!("{desc} "), theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use farmhand_core::{AnimalType, PanelConfig};

    fn test_app() -> App {
        let panel = Panel::new(PanelConfig::default()).unwrap();
        App::new(panel)
    }

    fn confirm_terminate(tag: u32) -> ConfirmAction {
        ConfirmAction::Terminate {
            tag: TagId::new(tag).unwrap(),
            animal: AnimalType::Sheep,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn cancelling_a_confirm_issues_nothing() {
        let mut app = test_app();
        app.process_action(&Action::ShowConfirm(confirm_terminate(4003)))
            .unwrap();
        assert!(app.pending_confirm.is_some());

        // 'n' maps to ConfirmNo while the dialog is up…
        let action = app.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(matches!(action, Some(Action::ConfirmNo)));

        // …and ConfirmNo just drops the pending action. No delete is
        // dispatched: nothing else changes.
        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
    }

    #[test]
    fn confirm_dialog_swallows_unrelated_keys() {
        let mut app = test_app();
        app.process_action(&Action::ShowConfirm(confirm_terminate(4003)))
            .unwrap();

        for code in [KeyCode::Char('f'), KeyCode::Char('t'), KeyCode::Enter] {
            let action = app.handle_key_event(key(code)).unwrap();
            assert!(action.is_none(), "confirm must capture {code:?}");
        }
    }

    #[test]
    fn a_new_modal_replaces_the_current_one() {
        let mut app = test_app();
        app.process_action(&Action::ShowModal(ModalContent::failure("first", "a")))
            .unwrap();
        app.process_action(&Action::ShowModal(ModalContent::failure("second", "b")))
            .unwrap();

        match &app.modal {
            Some(ModalContent::Failure { title, .. }) => assert_eq!(title, "second"),
            other => panic!("expected the second failure modal, got {other:?}"),
        }
    }

    #[test]
    fn modal_is_a_blocking_acknowledgment() {
        let mut app = test_app();
        app.process_action(&Action::ShowModal(ModalContent::failure("oops", "x")))
            .unwrap();

        // Panel keys are swallowed while the modal is up
        assert!(app.handle_key_event(key(KeyCode::Char('s'))).unwrap().is_none());

        // Dismissal keys close it
        let action = app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::CloseModal)));
        app.process_action(&Action::CloseModal).unwrap();
        assert!(app.modal.is_none());
    }
}
