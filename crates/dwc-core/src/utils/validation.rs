//! Input validation utilities
//!
//! Validates configuration values and command-line parameters before they
//! reach the gateway client or the table widgets.

use crate::error::CliError;

/// Validate that a URL is properly formatted
pub fn validate_url(url: &str) -> crate::Result<()> {
    if url.is_empty() {
        return Err(CliError::InvalidArguments("URL cannot be empty".to_string()).into());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(CliError::InvalidArguments(format!(
            "Invalid URL '{}': URL must start with http:// or https://",
            url
        ))
        .into());
    }

    Ok(())
}

/// Validate a records page size (must be positive)
pub fn validate_page_size(count: u64) -> crate::Result<()> {
    if count == 0 {
        return Err(
            CliError::InvalidArguments("Page size must be greater than zero".to_string()).into(),
        );
    }
    Ok(())
}

/// Validate a field key as accepted by the gateway (`[A-Za-z0-9_]+`)
pub fn validate_field_key(key: &str) -> crate::Result<()> {
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CliError::InvalidArguments(format!(
            "Invalid field name '{}': only letters, digits and '_' are allowed",
            key
        ))
        .into());
    }
    Ok(())
}
