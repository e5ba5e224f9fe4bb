//! Service integration layer for dwc-core.
//!
//! Wraps the gateway client so it can be shared across tokio tasks.

use std::sync::Arc;

use dwc_core::api::client::GatewayClient;
use dwc_core::api::models::{FieldCatalog, GatewaySummary, Record, ResultPage};
use dwc_core::core::query::RecordsQuery;
use dwc_core::core::source::RecordSource;
use dwc_core::error::ApiError;
use dwc_core::storage::config::Config;

/// Generic loading state for async data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    /// Initial state, no data loaded yet
    #[default]
    Idle,
    /// Data is being fetched
    Loading,
    /// Data successfully loaded
    Loaded(T),
    /// Loading failed with error message
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// Get reference to loaded data if available
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Service client wrapper for async operations.
///
/// Designed to be wrapped in Arc for sharing across tokio tasks.
pub struct ServiceClient {
    client: GatewayClient,
    base_url: String,
}

impl ServiceClient {
    /// Create a new service client for the gateway at `base_url`.
    pub fn new(base_url: String, base_dir: &str, timeout_secs: u64) -> Result<Self, String> {
        let client = GatewayClient::with_options(&base_url, base_dir, timeout_secs)
            .map_err(|e| format!("Failed to create client: {}", e))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_summary(&self) -> Result<GatewaySummary, ApiError> {
        self.client.summary().await
    }

    pub async fn fetch_fields(&self) -> Result<FieldCatalog, ApiError> {
        self.client.fields().await
    }

    pub async fn fetch_records(&self, query: &RecordsQuery) -> Result<ResultPage, ApiError> {
        self.client.fetch_records(query).await
    }

    pub async fn fetch_record(&self, id: &str) -> Result<Record, ApiError> {
        self.client.fetch_record(id).await
    }
}

/// Build the shared service client.
///
/// URL priority: `--url` / `DWCV_URL` > config file.
pub fn init_service(config: &Config, url: Option<String>) -> Result<Arc<ServiceClient>, String> {
    let base_url = url
        .filter(|u| !u.trim().is_empty())
        .or_else(|| config.get_url())
        .ok_or_else(|| {
            "No gateway URL. Pass --url, set DWCV_URL or run 'dwc-cli config set --url <url>'"
                .to_string()
        })?;

    ServiceClient::new(base_url, config.base_dir(), config.timeout_secs()).map(Arc::new)
}

/// Connection status for display
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionStatus {
    /// No gateway configured
    #[default]
    Disconnected,
    /// Waiting for the gateway summary
    Connecting,
    /// Gateway answered; holds the record count
    Connected(u64),
    /// Connection failed
    Error(String),
}
