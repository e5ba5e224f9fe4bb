use crate::api::models::{FieldCatalog, FieldInfo, FieldValueCount, GatewaySummary, Record, ResultPage};
use crate::core::query::RecordsQuery;
use crate::core::source::RecordSource;
use crate::error::{ApiError, CliError};
use crate::utils::error_helpers::*;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BASE_DIR: &str = "/gateway/";
const USER_AGENT: &str = concat!("dwc-views/", env!("CARGO_PKG_VERSION"));

/// HTTP client for a Darwin Core gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base: Url,
    timeout_secs: u64,
}

impl GatewayClient {
    /// Create a client for `gateway_url` with the default base dir and timeout.
    pub fn new(gateway_url: &str) -> crate::Result<Self> {
        Self::with_options(gateway_url, DEFAULT_BASE_DIR, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_options(gateway_url: &str, base_dir: &str, timeout_secs: u64) -> crate::Result<Self> {
        let base = Self::base_url(gateway_url, base_dir)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(GatewayClient {
            client,
            base,
            timeout_secs,
        })
    }

    fn base_url(gateway_url: &str, base_dir: &str) -> crate::Result<Url> {
        let dir = base_dir.trim_matches('/');
        let joined = if dir.is_empty() {
            format!("{}/", gateway_url.trim_end_matches('/'))
        } else {
            format!("{}/{}/", gateway_url.trim_end_matches('/'), dir)
        };

        let url = Url::parse(&joined).map_err(|e| {
            CliError::InvalidArguments(format!("Invalid gateway URL '{}': {}", joined, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(
                CliError::InvalidArguments(format!("Invalid gateway URL '{}'", joined)).into(),
            );
        }
        Ok(url)
    }

    /// Root of the gateway API, always ending in `/`.
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn records_url(&self, query: &RecordsQuery) -> Url {
        let mut url = self.endpoint_url(&["records"]);
        url.query_pairs_mut()
            .extend_pairs(query.to_params().iter().map(|(k, v)| (*k, v.as_str())));
        url
    }

    /// URL of a single record; the id becomes one percent-encoded path segment.
    pub fn record_url(&self, id: &str) -> Url {
        self.endpoint_url(&["record", id])
    }

    pub fn fields_url(&self) -> Url {
        self.endpoint_url(&["fields"])
    }

    pub fn field_url(&self, name: &str) -> Url {
        self.endpoint_url(&["fields", name])
    }

    pub fn field_values_url(&self, name: &str, filter: Option<&str>, count: Option<u64>) -> Url {
        let mut url = self.endpoint_url(&["fields", name, "values"]);
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(filter) = filter.filter(|f| !f.is_empty()) {
                pairs.append_pair("filter", filter);
            }
            if let Some(count) = count {
                pairs.append_pair("count", &count.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, url: Url) -> Result<T, ApiError> {
        log::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))?;

        self.handle_response(endpoint, response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| convert_json_error(e, endpoint))
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::warn!("{} returned {}", endpoint, status);
            Err(convert_status_error(status.as_u16(), endpoint, &error_text))
        }
    }

    /// Gateway summary (record count and timestamps).
    pub async fn summary(&self) -> Result<GatewaySummary, ApiError> {
        self.get_json("summary", self.base.clone()).await
    }

    pub async fn fields(&self) -> Result<FieldCatalog, ApiError> {
        self.get_json("fields", self.fields_url()).await
    }

    pub async fn field_info(&self, name: &str) -> Result<FieldInfo, ApiError> {
        let endpoint = format!("fields/{}", name);
        self.get_json(&endpoint, self.field_url(name)).await
    }

    /// Distinct values of a field with their record counts.
    pub async fn field_values(
        &self,
        name: &str,
        filter: Option<&str>,
        count: Option<u64>,
    ) -> Result<Vec<FieldValueCount>, ApiError> {
        let endpoint = format!("fields/{}/values", name);
        self.get_json(&endpoint, self.field_values_url(name, filter, count))
            .await
    }

    pub async fn records(&self, query: &RecordsQuery) -> Result<ResultPage, ApiError> {
        self.get_json("records", self.records_url(query)).await
    }

    pub async fn record(&self, id: &str) -> Result<Record, ApiError> {
        let endpoint = format!("record/{}", id);
        self.get_json(&endpoint, self.record_url(id)).await
    }
}

#[async_trait]
impl RecordSource for GatewayClient {
    async fn fetch_records(&self, query: &RecordsQuery) -> Result<ResultPage, ApiError> {
        self.records(query).await
    }

    async fn fetch_record(&self, id: &str) -> Result<Record, ApiError> {
        self.record(id).await
    }

    async fn fetch_fields(&self) -> Result<FieldCatalog, ApiError> {
        self.fields().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::SortOrder;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_normalization() {
        let client = GatewayClient::with_options("http://localhost:8000/", "gateway", 5).unwrap();
        assert_eq!(client.base().as_str(), "http://localhost:8000/gateway/");

        let client = GatewayClient::with_options("http://localhost:8000", "/", 5).unwrap();
        assert_eq!(client.base().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_invalid_gateway_url() {
        assert!(GatewayClient::new("not a url").is_err());
        assert!(GatewayClient::new("").is_err());
    }

    #[test]
    fn test_record_url_encodes_id() {
        let client = GatewayClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.record_url("MVZ:Herp 12/3").as_str(),
            "http://localhost:8000/gateway/record/MVZ:Herp%2012%2F3"
        );
    }

    #[test]
    fn test_records_url_params() {
        let client = GatewayClient::new("http://localhost:8000").unwrap();
        let query = RecordsQuery {
            start: 0,
            count: 25,
            fields: Some("id,lat".to_string()),
            order_by: Some("lat".to_string()),
            order: SortOrder::Descending,
            filter: None,
        };
        assert_eq!(
            client.records_url(&query).as_str(),
            "http://localhost:8000/gateway/records?count=25&fields=id%2Clat&orderby=lat&order=desc"
        );
    }

    #[test]
    fn test_field_values_url() {
        let client = GatewayClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.field_values_url("genus_s", None, None).as_str(),
            "http://localhost:8000/gateway/fields/genus_s/values"
        );
        assert_eq!(
            client.field_values_url("genus_s", Some("lat:1"), Some(5)).as_str(),
            "http://localhost:8000/gateway/fields/genus_s/values?filter=lat%3A1&count=5"
        );
    }

    #[tokio::test]
    async fn test_records_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/records"))
            .and(query_param("start", "25"))
            .and(query_param("count", "25"))
            .and(query_param("fields", "id,sciName_s"))
            .and(query_param_is_missing("orderby"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "numFound": 103,
                "start": 25,
                "docs": [{"id": "A.26", "sciName_s": "Esox lucius"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let query = RecordsQuery {
            start: 25,
            count: 25,
            fields: Some("id,sciName_s".to_string()),
            ..Default::default()
        };
        let page = client.records(&query).await.unwrap();
        assert_eq!(page.num_found, 103);
        assert_eq!(page.docs[0]["sciName_s"], json!("Esox lucius"));
    }

    #[tokio::test]
    async fn test_record_not_found_maps_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/record/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "name": "Not Found",
                "description": "Record 'missing' does not exist"
            })))
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let err = client.record("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.endpoint(), "record/missing");
        assert_eq!(
            err.to_string(),
            "HTTP error: 404 Not Found: Record 'missing' does not exist"
        );
    }

    #[tokio::test]
    async fn test_fields_list_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/fields"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["id", "genus_s"])))
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let catalog = client.fetch_fields().await.unwrap();
        assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["id", "genus_s"]);
    }

    #[tokio::test]
    async fn test_field_info_and_values() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/fields/genus_s"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "genus_s", "type": "string", "distinct": 2, "stored": true
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gateway/fields/genus_s/values"))
            .and(query_param("count", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([["Esox", 10], ["Salmo", 4]])),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let info = client.field_info("genus_s").await.unwrap();
        assert_eq!(info.stored, Some(true));
        let values = client.field_values("genus_s", None, Some(2)).await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].count(), 10);
    }

    #[tokio::test]
    async fn test_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "url": "http://localhost/gateway/",
                "numRecords": 12,
                "lastModified": "2011-02-14T10:00:00Z",
                "currentTime": "2011-02-15T10:00:00Z"
            })))
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        assert_eq!(client.summary().await.unwrap().num_records, 12);
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/records"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = GatewayClient::new(&server.uri()).unwrap();
        let query = RecordsQuery {
            count: 10,
            ..Default::default()
        };
        let err = client.records(&query).await.unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gateway/fields"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = GatewayClient::with_options(&server.uri(), DEFAULT_BASE_DIR, 1).unwrap();
        let err = client.fields().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Timeout {
                timeout_secs: 1,
                endpoint: "fields".to_string()
            }
        );
    }
}
