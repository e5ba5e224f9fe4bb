use crate::api::models::{FieldCatalog, Record, ResultPage};
use crate::core::query::RecordsQuery;
use crate::error::ApiError;
use async_trait::async_trait;

/// Anything the table widgets can read records from.
///
/// [`GatewayClient`](crate::api::client::GatewayClient) is the HTTP
/// implementation; tests substitute in-memory sources.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self, query: &RecordsQuery) -> Result<ResultPage, ApiError>;

    async fn fetch_record(&self, id: &str) -> Result<Record, ApiError>;

    async fn fetch_fields(&self) -> Result<FieldCatalog, ApiError>;
}
