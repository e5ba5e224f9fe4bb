//! Field menu popup.
//!
//! Draws a [`ContextMenu`] where its model says it is. Each item shows a
//! check mark for fields that are currently displayed. While the menu
//! fades in or out the whole popup is drawn dimmed.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use dwc_core::core::menu::{ContextMenu, MenuEntry};

use super::styles;

pub struct FieldMenuPopup;

impl FieldMenuPopup {
    fn entry_line(entry: MenuEntry, faded: bool) -> Line<'static> {
        if faded {
            let text = match entry {
                MenuEntry::Header { label } => label,
                MenuEntry::Item { label, on, .. } => {
                    format!("{}{}", if on { "[x] " } else { "[ ] " }, label)
                }
            };
            return Line::from(Span::styled(text, styles::TEXT_DIM));
        }
        match entry {
            MenuEntry::Header { label } => {
                Line::from(Span::styled(label, styles::header_style()))
            }
            MenuEntry::Item {
                label,
                on,
                selected,
                ..
            } => {
                let marker = if on { "[x] " } else { "[ ] " };
                let text = format!("{}{}", marker, label);
                if selected {
                    Line::from(Span::styled(text, styles::selected_style()))
                } else if on {
                    Line::from(Span::styled(text, styles::input_text_style()))
                } else {
                    Line::from(Span::styled(text, styles::TEXT_DIM))
                }
            }
        }
    }

    /// Render the menu if it is on screen; the popup is clipped to `bounds`.
    pub fn render<A: Clone>(frame: &mut Frame, menu: &ContextMenu<A>, bounds: Rect) {
        let Some(area) = menu.drawn_area() else {
            return;
        };
        let popup = Rect::new(area.x, area.y, area.width, area.height).intersection(bounds);
        if popup.is_empty() {
            return;
        }

        let faded = menu.fade().is_some();
        let lines: Vec<Line> = menu
            .entries()
            .into_iter()
            .map(|entry| Self::entry_line(entry, faded))
            .collect();
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::border_style(!faded)),
            ),
            popup,
        );
    }
}
