//! Application state and logic for the TUI.
//!
//! This module contains the core application state and the main run loop.
//! The records table, the record detail table and the field menu are the
//! UI-agnostic controllers from dwc-core; this crate feeds them input,
//! performs the fetches they plan and draws their state.
//!
//! ## Module Structure
//! - `mod.rs`: App struct definition, initialization, and rendering
//! - `action_handler.rs`: AppAction event processing
//! - `data_handler.rs`: Async data loading with tokio tasks
//! - `input_handler.rs`: Keyboard and mouse event processing

mod action_handler;
mod data_handler;
mod input_handler;

use std::sync::Arc;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tokio::sync::mpsc;

use dwc_core::api::models::FieldCatalog;
use dwc_core::core::map::MapFields;
use dwc_core::core::menu::MenuOverlay;
use dwc_core::core::record_table::RecordTable;
use dwc_core::core::records_table::RecordsTable;
use dwc_core::storage::config::Config;

use crate::action::{AppAction, DataRequest};
use crate::components::{
    ActiveTab, Component, FieldMenuPopup, HelpOverlay, MapView, RecordDetailPanel, RecordsView,
    StatusBar, styles,
};
use crate::error::TuiResult;
use crate::event::{Event, EventHandler};
use crate::layout::main::{HEADER_HEIGHT, STATUS_BAR_HEIGHT, TICK_RATE_MS};
use crate::service::{ConnectionStatus, LoadState, ServiceClient, init_service};

/// Which text box, if any, receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the records filter
    Filter,
    /// Typing a record id into the detail panel search box
    RecordSearch,
}

/// The main application state.
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Currently active tab
    pub(crate) active_tab: ActiveTab,
    /// Records table controller
    pub(crate) table: RecordsTable,
    /// Record detail controller
    pub(crate) detail: RecordTable,
    pub(crate) records_view: RecordsView,
    pub(crate) detail_panel: RecordDetailPanel,
    pub(crate) map_view: MapView,
    pub(crate) map_fields: MapFields,
    /// Status bar (bottom)
    pub(crate) status_bar: StatusBar,
    /// Service client for API access (Arc-wrapped for async sharing)
    pub(crate) service: Option<Arc<ServiceClient>>,
    /// Connection status
    pub(crate) connection_status: ConnectionStatus,
    /// Fields the gateway knows about
    pub(crate) catalog: LoadState<FieldCatalog>,
    pub(crate) input_mode: InputMode,
    /// Filter text being edited
    pub(crate) filter_input: String,
    /// Action sender for async operations
    pub(crate) action_tx: mpsc::UnboundedSender<AppAction>,
    /// Action receiver for processing
    action_rx: mpsc::UnboundedReceiver<AppAction>,
    /// Whether to show help overlay
    pub(crate) show_help: bool,
    /// Terminal size at the last draw
    pub(crate) viewport: (u16, u16),
    /// Body area at the last draw
    pub(crate) body_area: Rect,
}

impl App {
    /// Create a new application instance.
    ///
    /// `url` overrides the gateway URL from the configuration.
    pub fn new(config: &Config, url: Option<String>) -> TuiResult<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let table = RecordsTable::new(config.records_table_options(), MenuOverlay::new())?;
        let detail = RecordTable::new(table.id_field());

        let mut status_bar = StatusBar::new();
        let (service, connection_status) = match init_service(config, url) {
            Ok(client) => {
                log::info!("using gateway {}", client.base_url());
                (Some(client), ConnectionStatus::Connecting)
            }
            Err(e) => {
                log::warn!("no gateway client: {}", e);
                status_bar.set_error(e.clone());
                (None, ConnectionStatus::Error(e))
            }
        };

        Ok(Self {
            should_quit: false,
            active_tab: ActiveTab::Records,
            table,
            detail,
            records_view: RecordsView::new(),
            detail_panel: RecordDetailPanel::new(),
            map_view: MapView::new(),
            map_fields: config.map.clone(),
            status_bar,
            service,
            connection_status,
            catalog: LoadState::Idle,
            input_mode: InputMode::Normal,
            filter_input: String::new(),
            action_tx,
            action_rx,
            show_help: false,
            viewport: (0, 0),
            body_area: Rect::default(),
        })
    }

    /// Queue the startup requests: gateway summary, field list and, when
    /// configured, the first records page.
    pub(crate) fn start(&mut self) {
        if self.service.is_none() {
            return;
        }
        let _ = self.action_tx.send(AppAction::LoadData(DataRequest::Summary));
        let _ = self.action_tx.send(AppAction::LoadData(DataRequest::Fields));
        let plan = self.table.initial_fetch();
        self.dispatch_plan(plan);
    }

    /// Run the main application loop.
    pub async fn run_async(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> TuiResult<()> {
        let event_handler = EventHandler::new(TICK_RATE_MS);
        self.start();

        while !self.should_quit {
            // Process any pending actions
            self.process_actions();

            // Draw the UI
            terminal.draw(|frame| self.draw(frame))?;

            // Handle events
            match event_handler.next()? {
                Event::Key(key) => self.handle_key(key.code, key.modifiers),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(_, _) => {} // Terminal will redraw automatically
                Event::Tick => {
                    self.detail.tick();
                    self.table.menu_mut().tick();
                }
            }
        }

        Ok(())
    }

    /// Process pending actions from the action queue.
    pub(crate) fn process_actions(&mut self) {
        while let Ok(action) = self.action_rx.try_recv() {
            self.handle_action(action);
        }
    }

    /// Switch to a specific tab.
    pub(crate) fn switch_to_tab(&mut self, tab: ActiveTab) {
        self.active_tab = tab;
        self.status_bar.use_map_bindings(tab == ActiveTab::Map);
        self.status_bar
            .set_message(format!("Viewing: {}", tab.label()));
    }

    // =========================================================================
    // Drawing
    // =========================================================================

    /// Draw the UI.
    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let size = frame.area();
        self.viewport = (size.width, size.height);

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .split(size);
        let body = main_chunks[1];
        self.body_area = body;

        self.draw_header_with_tabs(frame, main_chunks[0]);

        let menu_open = self.table.menu().is_visible();
        match self.active_tab {
            ActiveTab::Records => {
                self.records_view
                    .render(frame, body, &self.table, !menu_open);
                self.detail_panel.render(
                    frame,
                    body,
                    &self.detail,
                    Some(self.table.fields()),
                    self.input_mode == InputMode::RecordSearch,
                );
            }
            ActiveTab::Map => self.map_view.draw(frame, body, true),
        }

        if self.input_mode == InputMode::Filter {
            self.draw_filter_input(frame, main_chunks[2]);
        } else {
            self.status_bar.draw(frame, main_chunks[2], false);
        }

        FieldMenuPopup::render(frame, self.table.menu(), size);

        if self.show_help {
            HelpOverlay::render(frame, size);
        }
    }

    fn draw_filter_input(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" Filter: ", styles::header_style()),
            Span::styled(self.filter_input.clone(), styles::input_text_style()),
            Span::styled("▏", styles::cursor_style()),
            Span::styled("  [Enter] apply  [Esc] cancel", styles::TEXT_DIM),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::BORDER_FOCUSED),
            ),
            area,
        );
    }

    /// Draw the header with integrated tab bar.
    fn draw_header_with_tabs(&self, frame: &mut Frame, area: Rect) {
        let connection_indicator = match &self.connection_status {
            ConnectionStatus::Disconnected => {
                Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
            }
            ConnectionStatus::Connecting => Span::styled(" ◐ ", Style::default().fg(Color::Yellow)),
            ConnectionStatus::Connected(count) => Span::styled(
                format!(" ● {} records ", count),
                Style::default().fg(Color::Green),
            ),
            ConnectionStatus::Error(_) => Span::styled(" ✗ ", Style::default().fg(Color::Red)),
        };

        let mut tab_spans: Vec<Span> = vec![Span::raw(" ")];
        for tab in [ActiveTab::Records, ActiveTab::Map] {
            let style = if tab == self.active_tab {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };
            tab_spans.push(Span::styled(
                format!(" {} {} ", tab.index() + 1, tab.label()),
                style,
            ));
            tab_spans.push(Span::raw(" "));
        }

        tab_spans.push(Span::styled("│", styles::TEXT_DIM));
        tab_spans.push(connection_indicator);
        if let Some(service) = &self.service {
            tab_spans.push(Span::styled(service.base_url().to_string(), styles::TEXT_DIM));
        }

        let header = Paragraph::new(Line::from(tab_spans)).block(
            Block::default()
                .title(" dwc-tui ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
                .borders(Borders::ALL)
                .border_style(styles::BORDER_UNFOCUSED),
        );
        frame.render_widget(header, area);
    }
}
