use crate::error::ApiError;

/// Helper functions for standardizing error conversions across the codebase.
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str, timeout_secs: u64) -> ApiError {
    if error.is_timeout() {
        return ApiError::Timeout {
            timeout_secs,
            endpoint: endpoint.to_string(),
        };
    }
    ApiError::Http {
        status: error.status().map(|s| s.as_u16()).unwrap_or(0),
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    ApiError::Parse {
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Build an HTTP error from a non-success response body.
///
/// The gateway reports errors as `{"name": ..., "description": ...}`; when the
/// body has that shape the description becomes the message, otherwise the raw
/// text is kept.
pub fn convert_status_error(status: u16, endpoint: &str, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            let name = v.get("name")?.as_str()?.to_string();
            let description = v
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or_default();
            Some(if description.is_empty() {
                name
            } else {
                format!("{}: {}", name, description)
            })
        })
        .unwrap_or_else(|| body.trim().to_string());

    ApiError::Http {
        status,
        endpoint: endpoint.to_string(),
        message,
    }
}
