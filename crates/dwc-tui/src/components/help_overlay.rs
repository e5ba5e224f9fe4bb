//! Help overlay component.
//!
//! Displays a modal overlay showing all available keybindings.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::centered_rect;

/// Help overlay showing keybindings.
pub struct HelpOverlay;

impl HelpOverlay {
    const GLOBAL_KEYS: &'static [(&'static str, &'static str)] = &[
        ("q / Ctrl+C", "Quit application"),
        ("Tab / 1 / 2", "Switch between Records and Map"),
        ("r", "Reload the current page"),
        ("?", "Toggle help"),
    ];

    const TABLE_KEYS: &'static [(&'static str, &'static str)] = &[
        ("↑ / k  ↓ / j", "Move between rows"),
        ("← / h  → / l", "Move between columns"),
        ("s", "Sort by column (again to flip)"),
        ("n / p", "Next / previous page"),
        ("g / G", "First / last page"),
        ("f / right-click", "Show or hide fields"),
        ("/", "Filter records"),
        ("Enter / click", "Open record or field"),
    ];

    const DETAIL_KEYS: &'static [(&'static str, &'static str)] = &[
        ("d", "Slide record panel in / out"),
        ("i", "Look up a record by id"),
        ("PgUp / PgDn", "Scroll record panel"),
        ("Esc", "Close panel or menu"),
    ];

    /// Render the help overlay centered on screen.
    pub fn render(frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 80, area);
        frame.render_widget(Clear, popup_area);

        let mut lines: Vec<Line> = vec![Line::from("")];
        Self::push_section(&mut lines, "Global", Self::GLOBAL_KEYS);
        Self::push_section(&mut lines, "Records", Self::TABLE_KEYS);
        Self::push_section(&mut lines, "Record panel", Self::DETAIL_KEYS);
        lines.push(Line::from(Span::styled(
            "  Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )));

        let help_text = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" Help ")
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .alignment(Alignment::Left);

        frame.render_widget(help_text, popup_area);
    }

    fn push_section(lines: &mut Vec<Line<'static>>, title: &'static str, keys: &[(&str, &str)]) {
        lines.push(Line::from(Span::styled(
            format!("  {}", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from("  ──────────────────────────────────"));
        for (key, action) in keys {
            lines.push(Self::format_keybinding(key, action));
        }
        lines.push(Line::from(""));
    }

    /// Format a single keybinding line.
    fn format_keybinding(key: &str, action: &str) -> Line<'static> {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                format!("{:<18}", key),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(action.to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_support::buffer_text;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_help_lists_table_keys() {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|frame| HelpOverlay::render(frame, frame.area()))
            .unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains(" Help "));
        assert!(text.contains("Show or hide fields"));
        assert!(text.contains("Look up a record by id"));
    }
}
