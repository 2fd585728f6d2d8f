//! Pasture palette and semantic styling for the panel.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const PASTURE_GREEN: Color = Color::Rgb(130, 200, 110); // #82c86e
pub const WHEAT_GOLD: Color = Color::Rgb(240, 198, 116); // #f0c674
pub const BARN_RED: Color = Color::Rgb(224, 108, 96); // #e06c60
pub const SKY_BLUE: Color = Color::Rgb(129, 192, 224); // #81c0e0
pub const CLOVER: Color = Color::Rgb(172, 226, 150); // #ace296

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(197, 200, 198); // #c5c8c6
pub const BORDER_GRAY: Color = Color::Rgb(112, 120, 128); // #707880
pub const BG_HIGHLIGHT: Color = Color::Rgb(45, 48, 42); // #2d302a

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(PASTURE_GREEN)
        .add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(WHEAT_GOLD)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(PASTURE_GREEN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Highlighted (selected) table row.
pub fn selected_row() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Dim field label.
pub fn label() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Field value.
pub fn value() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// A key in the footer hint bar.
pub fn key_hint_key() -> Style {
    Style::default()
        .fg(WHEAT_GOLD)
        .add_modifier(Modifier::BOLD)
}

/// Descriptive text in the footer hint bar.
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Style for an action that is currently unavailable.
pub fn disabled() -> Style {
    Style::default()
        .fg(BORDER_GRAY)
        .add_modifier(Modifier::DIM)
}

/// Success / error notification accents.
pub fn success() -> Style {
    Style::default().fg(CLOVER)
}

pub fn error() -> Style {
    Style::default().fg(BARN_RED).add_modifier(Modifier::BOLD)
}
