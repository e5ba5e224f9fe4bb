//! Status bar component.
//!
//! Displays keybindings and status messages at the bottom of the screen.

use crossterm::event::KeyEvent;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{Component, styles};

/// Key binding display item.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyBinding {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

const RECORDS_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("↑↓", "Row"),
    KeyBinding::new("←→", "Column"),
    KeyBinding::new("s", "Sort"),
    KeyBinding::new("n/p", "Page"),
    KeyBinding::new("f", "Fields"),
    KeyBinding::new("/", "Filter"),
    KeyBinding::new("Enter", "Open"),
    KeyBinding::new("?", "Help"),
    KeyBinding::new("q", "Quit"),
];

const MAP_BINDINGS: &[KeyBinding] = &[
    KeyBinding::new("[ ]", "Point"),
    KeyBinding::new("z", "Zoom"),
    KeyBinding::new("Enter", "Open"),
    KeyBinding::new("Tab", "Records"),
    KeyBinding::new("?", "Help"),
    KeyBinding::new("q", "Quit"),
];

/// Status bar showing keybindings and messages.
pub struct StatusBar {
    message: String,
    is_error: bool,
    bindings: &'static [KeyBinding],
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBar {
    /// Create a new status bar with the records table keybindings.
    pub fn new() -> Self {
        Self {
            message: String::new(),
            is_error: false,
            bindings: RECORDS_BINDINGS,
        }
    }

    /// Set a status message.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.is_error = false;
    }

    /// Set a message rendered as an error.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.is_error = true;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Switch between the records and map keybinding hints.
    pub fn use_map_bindings(&mut self, map: bool) {
        self.bindings = if map { MAP_BINDINGS } else { RECORDS_BINDINGS };
    }
}

impl Component for StatusBar {
    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let mut spans: Vec<Span> = Vec::new();

        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", styles::TEXT_DIM));
            }
            spans.push(Span::styled(
                format!(" {} ", binding.key),
                Style::default().fg(Color::Yellow),
            ));
            spans.push(Span::raw(binding.action));
        }

        if !self.message.is_empty() {
            let style = if self.is_error {
                styles::TEXT_ERROR
            } else {
                styles::TEXT_SUCCESS
            };
            spans.push(Span::styled(" │ ", styles::TEXT_DIM));
            spans.push(Span::styled(self.message.clone(), style));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(styles::BORDER_UNFOCUSED),
        );

        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        // Status bar doesn't handle keys
        false
    }
}
