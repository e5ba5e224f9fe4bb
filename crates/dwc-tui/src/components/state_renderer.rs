//! LoadState rendering helpers.
//!
//! Placeholders shown instead of a view's content while it has nothing to
//! display yet.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::styles;
use crate::service::LoadState;

/// Configuration for rendering LoadState views.
pub struct LoadStateConfig<'a> {
    /// Title for the view
    pub title: &'a str,
    /// Message shown in Idle state
    pub idle_message: &'a str,
    /// Message shown in Loading state
    pub loading_message: &'a str,
    /// Border style based on focus state
    pub border_style: Style,
}

impl<'a> LoadStateConfig<'a> {
    /// Create a new LoadStateConfig with the given title and focused state.
    pub fn new(title: &'a str, focused: bool) -> Self {
        Self {
            title,
            idle_message: "Press 'r' to load records",
            loading_message: "Loading...",
            border_style: styles::border_style(focused),
        }
    }

    pub fn with_idle_message(mut self, message: &'a str) -> Self {
        self.idle_message = message;
        self
    }

    pub fn with_loading_message(mut self, message: &'a str) -> Self {
        self.loading_message = message;
        self
    }

    fn block(&self) -> Block<'a> {
        Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(self.border_style)
    }
}

fn render_lines(frame: &mut Frame, area: Rect, config: &LoadStateConfig<'_>, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines).block(config.block());
    frame.render_widget(paragraph, area);
}

/// Render the Idle state placeholder.
pub fn render_idle(frame: &mut Frame, area: Rect, config: &LoadStateConfig<'_>) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", config.idle_message),
                styles::TEXT_DIM,
            )),
        ],
    );
}

/// Render the Loading state placeholder.
pub fn render_loading(frame: &mut Frame, area: Rect, config: &LoadStateConfig<'_>) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  ⏳ {}", config.loading_message),
                styles::TEXT_WARNING,
            )),
        ],
    );
}

/// Render the Error state with message and retry hint.
pub fn render_error(frame: &mut Frame, area: Rect, config: &LoadStateConfig<'_>, error_msg: &str) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  ❌ Error: {}", error_msg),
                styles::TEXT_ERROR,
            )),
            Line::from(""),
            Line::from(Span::styled("  Press 'r' to retry", styles::TEXT_DIM)),
        ],
    );
}

/// Render an empty state placeholder with a custom message.
pub fn render_empty(
    frame: &mut Frame,
    area: Rect,
    config: &LoadStateConfig<'_>,
    empty_message: &str,
) {
    render_lines(
        frame,
        area,
        config,
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("  {}", empty_message), styles::TEXT_DIM)),
        ],
    );
}

/// Render the non-Loaded states (Idle, Loading, Error) for a LoadState.
/// Returns true if the state was handled (not Loaded), false if Loaded.
pub fn render_non_loaded_state<T>(
    frame: &mut Frame,
    area: Rect,
    state: &LoadState<T>,
    config: &LoadStateConfig<'_>,
) -> bool {
    match state {
        LoadState::Idle => {
            render_idle(frame, area, config);
            true
        }
        LoadState::Loading => {
            render_loading(frame, area, config);
            true
        }
        LoadState::Error(msg) => {
            render_error(frame, area, config, msg);
            true
        }
        LoadState::Loaded(_) => false,
    }
}
