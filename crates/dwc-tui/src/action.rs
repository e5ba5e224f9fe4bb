//! Application actions for event-driven architecture.
//!
//! Implements Flux-like unidirectional data flow:
//! Input → AppAction → App State → Component Re-render
//!
//! Fetches run in tokio tasks and report back through the same channel.
//! Completions carry the sequence number of the request that produced them so
//! the widgets can drop answers to superseded requests.

use dwc_core::api::models::{FieldCatalog, GatewaySummary, Record, ResultPage};
use dwc_core::core::records_table::TableCommand;
use dwc_core::error::ApiError;

/// Application-level actions for component-to-app communication.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,

    /// Run a records table command (paging, sorting, field toggles, filter)
    Table(TableCommand),

    /// Look up a record by id and show it in the detail panel
    ShowRecord(String),

    /// Load data from the gateway
    LoadData(DataRequest),

    /// Update status message
    SetStatus(String),

    // === Completion Notifications ===
    /// A records page arrived (or failed) for request `seq`
    RecordsLoaded {
        seq: u64,
        result: Result<ResultPage, ApiError>,
    },

    /// A single record arrived (or failed) for request `seq`
    RecordLoaded {
        seq: u64,
        result: Result<Record, ApiError>,
    },

    /// Field catalog loaded from the gateway
    FieldsLoaded(FieldCatalog),

    /// Gateway summary loaded
    SummaryLoaded(GatewaySummary),

    /// Data loading failed with context and error message
    LoadFailed(DataRequest, String),
}

/// Data loading requests that are not tied to a widget's sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataRequest {
    /// Gateway root: record count and timestamps
    Summary,
    /// The list of fields the gateway knows about
    Fields,
}

impl DataRequest {
    pub fn label(self) -> &'static str {
        match self {
            DataRequest::Summary => "gateway summary",
            DataRequest::Fields => "field list",
        }
    }
}
