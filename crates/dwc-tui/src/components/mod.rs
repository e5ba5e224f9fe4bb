//! UI Components for dwc-tui.
//!
//! This module provides reusable UI components with a common interface.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};

mod field_menu;
mod help_overlay;
mod map_view;
mod record_detail;
mod records_view;
pub mod state_renderer;
mod status_bar;
pub mod styles;

pub use field_menu::FieldMenuPopup;
pub use help_overlay::HelpOverlay;
pub use map_view::MapView;
pub use record_detail::RecordDetailPanel;
pub use records_view::{RecordsView, TableHit};
pub use status_bar::StatusBar;

/// Active tab for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTab {
    #[default]
    Records,
    Map,
}

impl ActiveTab {
    /// Get the index of this tab.
    pub fn index(self) -> usize {
        match self {
            ActiveTab::Records => 0,
            ActiveTab::Map => 1,
        }
    }

    /// Get the other tab.
    pub fn next(self) -> Self {
        match self {
            ActiveTab::Records => ActiveTab::Map,
            ActiveTab::Map => ActiveTab::Records,
        }
    }

    /// Get display label with icon.
    pub fn label(self) -> &'static str {
        match self {
            ActiveTab::Records => "📋 Records",
            ActiveTab::Map => "🗺 Map",
        }
    }
}

/// Common trait for all UI components.
pub trait Component {
    /// Draw the component within the given area.
    /// Takes `&mut self` to support stateful widgets like TableState.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool);

    /// Handle keyboard input. Returns true if the event was consumed.
    fn handle_key(&mut self, key: KeyEvent) -> bool;
}

/// Calculate a centered rect with percentage-based dimensions.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_tab_cycles() {
        assert_eq!(ActiveTab::Records.next(), ActiveTab::Map);
        assert_eq!(ActiveTab::Map.next(), ActiveTab::Records);
        assert_eq!(ActiveTab::Map.index(), 1);
    }

    #[test]
    fn test_centered_rect() {
        let area = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(area, Rect::new(25, 10, 50, 20));
    }
}
