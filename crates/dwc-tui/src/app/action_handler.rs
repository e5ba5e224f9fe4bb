//! Action handling for the application.
//!
//! Processes AppAction events: table commands, record lookups and the
//! completions of background fetches.

use dwc_core::api::models::{Record, ResultPage};
use dwc_core::core::map::map_points;
use dwc_core::core::records_table::{SelectionHandler, TableCommand};
use dwc_core::core::render::record_id;
use dwc_core::error::{ApiError, TableError};
use dwc_core::utils::text::display_value;

use crate::action::{AppAction, DataRequest};
use crate::service::{ConnectionStatus, LoadState};

use super::{App, InputMode};

/// Collects what an activated cell asked for.
struct Activation<'a> {
    id_field: &'a str,
    record_id: Option<String>,
    field: Option<(String, String)>,
}

impl SelectionHandler for Activation<'_> {
    fn on_row_selected(&mut self, record: &Record) {
        self.record_id = record_id(record, self.id_field);
    }

    fn on_field_activated(&mut self, key: &str, record: &Record) {
        let value = record.get(key).map(display_value).unwrap_or_default();
        self.field = Some((key.to_string(), value));
    }
}

impl App {
    /// Handle an application action.
    pub(crate) fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Table(command) => self.run_table_command(command),
            AppAction::ShowRecord(id) => self.show_record(&id),
            AppAction::LoadData(request) => self.handle_data_request(request),
            AppAction::SetStatus(message) => self.status_bar.set_message(message),
            AppAction::RecordsLoaded { seq, result } => self.on_records_loaded(seq, result),
            AppAction::RecordLoaded { seq, result } => self.on_record_loaded(seq, result),
            AppAction::FieldsLoaded(catalog) => {
                self.status_bar
                    .set_message(format!("{} fields available", catalog.len()));
                self.table.install_field_menu(catalog.clone());
                self.catalog = LoadState::Loaded(catalog);
            }
            AppAction::SummaryLoaded(summary) => {
                self.connection_status = ConnectionStatus::Connected(summary.num_records);
            }
            AppAction::LoadFailed(request, message) => {
                log::warn!("loading {} failed: {}", request.label(), message);
                match request {
                    DataRequest::Summary => {
                        self.connection_status = ConnectionStatus::Error(message.clone());
                    }
                    DataRequest::Fields => {
                        self.catalog = LoadState::Error(message.clone());
                    }
                }
                self.status_bar
                    .set_error(format!("Failed to load {}: {}", request.label(), message));
            }
        }
    }

    pub(crate) fn run_table_command(&mut self, command: TableCommand) {
        log::debug!("table command {:?}", command);
        match self.table.update(command) {
            Ok(plan) => self.dispatch_plan(plan),
            Err(e) => self.status_bar.set_error(e.to_string()),
        }
    }

    /// Refresh view state that depends on the rendered rows.
    pub(crate) fn after_records_rendered(&mut self) {
        self.records_view
            .clamp(self.table.rows().len(), self.table.column_count());
        let points = self
            .table
            .cached_page()
            .map(|page| map_points(page, &self.map_fields))
            .unwrap_or_default();
        self.map_view.set_points(points);
        self.status_bar
            .set_message(self.table.paging_label().to_string());
    }

    fn on_records_loaded(&mut self, seq: u64, result: Result<ResultPage, ApiError>) {
        match self.table.apply_response(seq, result) {
            Ok(()) => self.after_records_rendered(),
            // Superseded by a newer request; the table already logged it
            Err(TableError::StaleResponse { .. }) => {}
            Err(e) => self.status_bar.set_error(e.to_string()),
        }
    }

    fn on_record_loaded(&mut self, seq: u64, result: Result<Record, ApiError>) {
        match self.detail.apply_record(seq, result) {
            Ok(()) => {
                let id = self.detail.record_id().unwrap_or_default().to_string();
                self.status_bar.set_message(format!("Record {}", id));
            }
            Err(TableError::StaleResponse { .. }) => {}
            Err(e) => self.status_bar.set_error(e.to_string()),
        }
    }

    /// Fetch record `id` and slide the detail panel in once it arrives.
    pub(crate) fn show_record(&mut self, id: &str) {
        let request = self.detail.set_record_id(id, true);
        self.load_record(request);
    }

    /// Activate the cell at `row`/`column` of the current page.
    ///
    /// The id column opens the record; clickable fields prefill the filter
    /// with their value for the user to confirm.
    pub(crate) fn activate_cell(&mut self, row: usize, column: usize) {
        let Some(key) = self
            .table
            .header()
            .get(column)
            .and_then(|h| h.key.clone())
        else {
            return;
        };

        let mut activation = Activation {
            id_field: self.table.id_field(),
            record_id: None,
            field: None,
        };
        if !self.table.activate_cell(row, &key, &mut activation) {
            return;
        }
        let Activation {
            record_id, field, ..
        } = activation;

        if let Some(id) = record_id {
            self.show_record(&id);
        } else if let Some((key, value)) = field {
            self.filter_input = format!("{}:\"{}\"", key, value);
            self.input_mode = InputMode::Filter;
        }
    }
}
