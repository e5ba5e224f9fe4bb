//! Shared style definitions for TUI components.
//!
//! This module provides consistent styling across all TUI views.

use ratatui::style::{Color, Modifier, Style};

use dwc_core::core::render::Parity;

// === Border Styles ===

/// Border style for focused components.
pub const BORDER_FOCUSED: Style = Style::new().fg(Color::Cyan);

/// Border style for unfocused components.
pub const BORDER_UNFOCUSED: Style = Style::new().fg(Color::DarkGray);

/// Get border style based on focus state.
#[inline]
pub fn border_style(focused: bool) -> Style {
    if focused {
        BORDER_FOCUSED
    } else {
        BORDER_UNFOCUSED
    }
}

// === Table Styles ===

/// Style for table header text.
pub fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Header cell of the column the table is sorted by.
pub fn sorted_header_style() -> Style {
    header_style().add_modifier(Modifier::UNDERLINED)
}

/// Header cell of the column under the cursor.
pub fn focused_header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Style for table row when selected/highlighted.
pub fn row_highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Background striping by row parity.
pub fn row_style(parity: Parity) -> Style {
    match parity {
        Parity::Odd => Style::default(),
        Parity::Even => Style::default().bg(Color::Rgb(30, 30, 40)),
    }
}

/// Cells that open something when activated.
pub fn clickable_cell_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::UNDERLINED)
}

/// Default highlight symbol for table selection.
pub const HIGHLIGHT_SYMBOL: &str = "► ";

// === Text Styles ===

/// Style for dimmed/hint text.
pub const TEXT_DIM: Style = Style::new().fg(Color::DarkGray);

/// Style for warning/loading text.
pub const TEXT_WARNING: Style = Style::new().fg(Color::Yellow);

/// Style for error text.
pub const TEXT_ERROR: Style = Style::new().fg(Color::Red);

/// Style for success text.
pub const TEXT_SUCCESS: Style = Style::new().fg(Color::Green);

// === Modal Styles ===

/// Style for modal titles.
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// Style for selected items in lists.
pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

// === Input Styles ===

/// Style for cursor indicator.
pub fn cursor_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::SLOW_BLINK)
}

/// Style for input text.
pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

// === Map Styles ===

pub const MAP_COASTLINE: Color = Color::DarkGray;

pub const MAP_POINT: Color = Color::LightGreen;

pub const MAP_POINT_SELECTED: Color = Color::Yellow;
