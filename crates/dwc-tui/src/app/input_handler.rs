//! Keyboard and mouse input handling for the application.
//!
//! Processes input events and delegates to appropriate handlers based on
//! current application state (overlays, menu, text input, active tab).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use dwc_core::core::records_table::TableCommand;
use dwc_core::core::render::record_id;

use crate::action::AppAction;
use crate::components::{ActiveTab, Component, TableHit};

use super::{App, InputMode};

impl App {
    /// Handle keyboard input with delegated responsibility.
    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        // 1. Overlay handling (highest priority)
        if self.handle_overlay_keys(code) {
            return;
        }

        // 2. Text input handling
        if self.handle_input_mode_keys(code) {
            return;
        }

        // 3. Global keybindings
        if self.handle_global_keys(code, modifiers) {
            return;
        }

        // 4. Keys of the active tab
        let key = KeyEvent::new(code, modifiers);
        match self.active_tab {
            ActiveTab::Records => self.handle_records_keys(key),
            ActiveTab::Map => self.handle_map_keys(key),
        }
    }

    /// Handle keyboard input when the help overlay or field menu is open.
    /// Returns true if the key was handled.
    fn handle_overlay_keys(&mut self, code: KeyCode) -> bool {
        if self.show_help {
            if matches!(code, KeyCode::Char('?') | KeyCode::Esc) {
                self.show_help = false;
            }
            return true;
        }

        if self.table.menu().is_visible() {
            match code {
                KeyCode::Up | KeyCode::Char('k') => self.table.menu_mut().move_up(),
                KeyCode::Down | KeyCode::Char('j') => self.table.menu_mut().move_down(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let command = self.table.menu_mut().activate_selected();
                    self.run_menu_command(command);
                }
                KeyCode::Esc | KeyCode::Char('f') => self.table.menu_mut().hide(),
                _ => {}
            }
            return true;
        }

        false
    }

    /// Handle typed text for the filter box and the record id search box.
    /// Returns true if the key was handled.
    fn handle_input_mode_keys(&mut self, code: KeyCode) -> bool {
        match self.input_mode {
            InputMode::Normal => false,
            InputMode::Filter => {
                match code {
                    KeyCode::Enter => {
                        let filter = std::mem::take(&mut self.filter_input);
                        self.input_mode = InputMode::Normal;
                        let filter = Some(filter).filter(|f| !f.trim().is_empty());
                        self.run_table_command(TableCommand::SetFilter(filter));
                    }
                    KeyCode::Esc => {
                        self.filter_input.clear();
                        self.input_mode = InputMode::Normal;
                    }
                    KeyCode::Backspace => {
                        self.filter_input.pop();
                    }
                    KeyCode::Char(c) => self.filter_input.push(c),
                    _ => {}
                }
                true
            }
            InputMode::RecordSearch => {
                match code {
                    KeyCode::Enter => {
                        self.input_mode = InputMode::Normal;
                        if let Some(request) = self.detail.submit_search(true) {
                            self.load_record(request);
                        }
                    }
                    KeyCode::Esc => self.input_mode = InputMode::Normal,
                    KeyCode::Backspace => self.detail.pop_search_char(),
                    KeyCode::Char(c) => self.detail.push_search_char(c),
                    _ => {}
                }
                true
            }
        }
    }

    /// Handle global keybindings (quit, help, tab switch, refresh, panel).
    /// Returns true if the key was handled.
    fn handle_global_keys(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                true
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_to_tab(self.active_tab.next());
                true
            }
            KeyCode::Char('1') => {
                self.switch_to_tab(ActiveTab::Records);
                true
            }
            KeyCode::Char('2') => {
                self.switch_to_tab(ActiveTab::Map);
                true
            }
            KeyCode::Char('r') => {
                self.run_table_command(TableCommand::Refresh);
                true
            }
            KeyCode::Char('d') => {
                self.detail.toggle();
                true
            }
            KeyCode::Char('i') => {
                self.switch_to_tab(ActiveTab::Records);
                self.detail.show();
                self.input_mode = InputMode::RecordSearch;
                true
            }
            KeyCode::Esc => {
                if self.detail.is_shown() {
                    self.detail.hide();
                } else {
                    self.should_quit = true;
                }
                true
            }
            _ => false,
        }
    }

    fn handle_records_keys(&mut self, key: KeyEvent) {
        let command = match key.code {
            KeyCode::Char('n') => Some(TableCommand::NextPage),
            KeyCode::Char('p') => Some(TableCommand::PrevPage),
            KeyCode::Char('g') => Some(TableCommand::FirstPage),
            KeyCode::Char('G') => Some(TableCommand::LastPage),
            KeyCode::Char('s') => self.focused_column_key().map(TableCommand::Sort),
            _ => None,
        };
        if let Some(command) = command {
            self.run_table_command(command);
            return;
        }

        match key.code {
            KeyCode::Char('f') => {
                let position = self.records_view.focused_header_position();
                self.open_field_menu(position);
            }
            KeyCode::Char('/') => {
                self.filter_input = self.table.query().filter.clone().unwrap_or_default();
                self.input_mode = InputMode::Filter;
            }
            KeyCode::Enter => {
                if let Some(row) = self.records_view.selected_row() {
                    self.activate_cell(row, self.records_view.focused_column());
                }
            }
            KeyCode::PageDown => {
                let rows = self.detail.grid(None).len();
                self.detail_panel.scroll_down(rows);
            }
            KeyCode::PageUp => self.detail_panel.scroll_up(),
            _ => {
                self.records_view.handle_key(
                    key,
                    self.table.rows().len(),
                    self.table.column_count(),
                );
            }
        }
    }

    fn handle_map_keys(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Enter {
            let id = self
                .map_view
                .selected_point()
                .and_then(|p| self.table.record(p.row))
                .and_then(|record| record_id(record, self.table.id_field()));
            if let Some(id) = id {
                self.switch_to_tab(ActiveTab::Records);
                let _ = self.action_tx.send(AppAction::ShowRecord(id));
            }
            return;
        }
        self.map_view.handle_key(key);
    }

    fn focused_column_key(&self) -> Option<String> {
        self.table
            .header()
            .get(self.records_view.focused_column())
            .and_then(|h| h.key.clone())
    }

    fn open_field_menu(&mut self, position: (u16, u16)) {
        if self.catalog.data().is_none() {
            self.status_bar.set_error("Field list not loaded yet");
            return;
        }
        self.table.show_field_menu(position, self.viewport);
    }

    fn run_menu_command(&mut self, command: Option<TableCommand>) {
        match self.table.run_menu_command(command) {
            Ok(plan) => self.dispatch_plan(plan),
            Err(e) => self.status_bar.set_error(e.to_string()),
        }
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    /// Handle mouse clicks and scrolling.
    pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = (mouse.column, mouse.row);
        let right = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => false,
            MouseEventKind::Down(MouseButton::Right) => true,
            MouseEventKind::ScrollDown if self.active_tab == ActiveTab::Records => {
                self.records_view.select_next(self.table.rows().len());
                return;
            }
            MouseEventKind::ScrollUp if self.active_tab == ActiveTab::Records => {
                self.records_view.select_previous();
                return;
            }
            _ => return,
        };

        if self.show_help {
            self.show_help = false;
            return;
        }

        // While the menu is open every click belongs to it or its overlay
        if self.table.menu().is_visible() {
            let command = self.table.menu_mut().click(x, y, right);
            self.run_menu_command(command);
            return;
        }

        if self.active_tab != ActiveTab::Records {
            return;
        }
        if self.detail_panel.area().is_some_and(|a| a.contains((x, y).into())) {
            return;
        }
        if right {
            if self.body_area.contains((x, y).into()) {
                self.open_field_menu((x, y));
            }
            return;
        }

        match self.records_view.hit_test(x, y, self.table.rows().len()) {
            Some(TableHit::Header { column }) => {
                if let Some(key) = self.table.header().get(column).and_then(|h| h.key.clone()) {
                    self.records_view.focus_column(column);
                    self.run_table_command(TableCommand::Sort(key));
                }
            }
            Some(TableHit::Cell { row, column }) => {
                self.records_view.select_row(row);
                self.records_view.focus_column(column);
                self.activate_cell(row, column);
            }
            None => {}
        }
    }
}
