//! Data loading request handling.
//!
//! Spawns async tasks that fetch from the gateway and report back through
//! the action channel.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use dwc_core::core::record_table::RecordRequest;
use dwc_core::core::records_table::{FetchPlan, RecordsRequest};
use dwc_core::error::ApiError;

use crate::action::{AppAction, DataRequest};
use crate::service::{LoadState, ServiceClient};

use super::App;

fn not_connected(endpoint: &str) -> ApiError {
    ApiError::Http {
        status: 0,
        endpoint: endpoint.to_string(),
        message: "Not connected to a gateway".to_string(),
    }
}

impl App {
    fn service_and_sender(&self) -> Option<(Arc<ServiceClient>, UnboundedSender<AppAction>)> {
        let service = Arc::clone(self.service.as_ref()?);
        Some((service, self.action_tx.clone()))
    }

    /// Handle data loading request with background task spawning.
    pub(super) fn handle_data_request(&mut self, request: DataRequest) {
        let Some((service, tx)) = self.service_and_sender() else {
            self.status_bar
                .set_error("Error: Not connected to a gateway");
            return;
        };

        match request {
            DataRequest::Summary => {
                tokio::spawn(async move {
                    let action = match service.fetch_summary().await {
                        Ok(summary) => AppAction::SummaryLoaded(summary),
                        Err(e) => AppAction::LoadFailed(DataRequest::Summary, e.to_string()),
                    };
                    let _ = tx.send(action);
                });
            }
            DataRequest::Fields => {
                if self.catalog.is_loading() {
                    return;
                }
                self.catalog = LoadState::Loading;
                tokio::spawn(async move {
                    let action = match service.fetch_fields().await {
                        Ok(catalog) => AppAction::FieldsLoaded(catalog),
                        Err(e) => AppAction::LoadFailed(DataRequest::Fields, e.to_string()),
                    };
                    let _ = tx.send(action);
                });
            }
        }
    }

    /// Carry out what a records table operation asked for.
    pub(crate) fn dispatch_plan(&mut self, plan: Option<FetchPlan>) {
        match plan {
            // Nothing changed, e.g. "previous page" on the first page
            None => {}
            Some(FetchPlan::FromCache) => self.after_records_rendered(),
            Some(FetchPlan::Remote(request)) => self.load_records(request),
        }
    }

    fn load_records(&mut self, request: RecordsRequest) {
        let RecordsRequest { seq, query } = request;
        let Some((service, tx)) = self.service_and_sender() else {
            // Let the table roll back its paging state
            let _ = self.action_tx.send(AppAction::RecordsLoaded {
                seq,
                result: Err(not_connected("records")),
            });
            return;
        };

        self.status_bar.set_message("Loading records...");
        tokio::spawn(async move {
            let result = service.fetch_records(&query).await;
            let _ = tx.send(AppAction::RecordsLoaded { seq, result });
        });
    }

    /// Look up a record for the detail panel.
    pub(crate) fn load_record(&mut self, request: RecordRequest) {
        let RecordRequest { seq, id } = request;
        self.detail_panel.reset_scroll();
        let Some((service, tx)) = self.service_and_sender() else {
            let _ = self.action_tx.send(AppAction::RecordLoaded {
                seq,
                result: Err(not_connected("record")),
            });
            return;
        };

        self.status_bar
            .set_message(format!("Loading record {}...", id));
        tokio::spawn(async move {
            let result = service.fetch_record(&id).await;
            let _ = tx.send(AppAction::RecordLoaded { seq, result });
        });
    }
}
