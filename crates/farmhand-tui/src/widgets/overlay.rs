//! Overlay rendering: the modal report dialog, the confirmation prompt,
//! and the notification toast.
//!
//! One modal at a time — presenting new content replaces whatever is
//! showing, and dismissal always returns to the panel underneath.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use crate::action::{ConfirmAction, ModalContent, Notification, NotificationLevel};
use crate::theme;

/// A centered rect of at most `width`×`height`, clamped to `area`.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let [_, vertical, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, rect, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width),
        Constraint::Fill(1),
    ])
    .areas(vertical);
    rect
}

fn labeled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<18}"), theme::label()),
        Span::styled(value, theme::value()),
    ])
}

/// Render the modal overlay for a report or failure acknowledgment.
pub fn render_modal(frame: &mut Frame, area: Rect, content: &ModalContent) {
    let (title, lines, border) = match content {
        ModalContent::Resources {
            tag,
            animal,
            totals,
        } => {
            let title = format!(" Resources Spent on {} #{tag} ", animal.label());
            let lines = match totals {
                Some(totals) => vec![
                    Line::from(""),
                    labeled("Total food", totals.food.to_string()),
                    labeled("Total water", totals.water.to_string()),
                ],
                None => vec![
                    Line::from(""),
                    Line::styled(
                        "  No consumption recorded — this animal has been neglected.",
                        theme::label(),
                    ),
                ],
            };
            (title, lines, theme::border_focused())
        }
        ModalContent::VetHistory {
            tag,
            animal,
            record,
        } => {
            let title = format!(" Veterinary Records for {} #{tag} ", animal.label());
            let lines = match record {
                Some(record) => vec![
                    Line::from(""),
                    labeled("Record ID", format!("#{}", record.record_id)),
                    labeled("Health status", record.health_status.clone()),
                    labeled(
                        "Record date",
                        record
                            .record_date
                            .map_or_else(|| "—".into(), |d| d.format("%Y-%m-%d").to_string()),
                    ),
                ],
                None => vec![
                    Line::from(""),
                    Line::styled("  No records found.", theme::label()),
                ],
            };
            (title, lines, theme::border_focused())
        }
        ModalContent::Failure { title, message } => {
            let lines = vec![
                Line::from(""),
                Line::styled(format!("  {message}"), theme::value()),
            ];
            (format!(" {title} "), lines, theme::error())
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    let height = lines.len() as u16 + 4;
    let rect = centered_rect(56, height, area);
    frame.render_widget(Clear, rect);

    let mut text = lines;
    text.push(Line::from(""));
    text.push(
        Line::from(vec![
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" / ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" close", theme::key_hint()),
        ])
        .alignment(Alignment::Center),
    );

    let block = Block::default()
        .title(title)
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), rect);
}

/// Render the confirmation prompt. Captures all input until answered.
pub fn render_confirm(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let rect = centered_rect(56, 7, area);
    frame.render_widget(Clear, rect);

    let text = vec![
        Line::from(""),
        Line::styled(format!("  {confirm}"), theme::value()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme::key_hint_key()),
            Span::styled(" confirm   ", theme::key_hint()),
            Span::styled("n", theme::key_hint_key()),
            Span::styled(" / ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ])
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::error());

    frame.render_widget(Paragraph::new(text).block(block), rect);
}

/// Render the notification toast in the top-right corner.
pub fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    #[allow(clippy::cast_possible_truncation)]
    let width = (notification.message.len() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3,
    };
    frame.render_widget(Clear, rect);

    let style = match notification.level {
        NotificationLevel::Success => theme::success(),
        NotificationLevel::Error => theme::error(),
        NotificationLevel::Info => theme::value(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);

    frame.render_widget(
        Paragraph::new(Line::styled(notification.message.clone(), style)).block(block),
        rect,
    );
}
