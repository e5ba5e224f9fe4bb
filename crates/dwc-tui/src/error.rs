//! Error types for dwc-tui.

use std::io;
use thiserror::Error;

use dwc_core::error::{StorageError, TableError};

/// TUI-specific error type.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal I/O error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Service/API error.
    #[error("Service error: {0}")]
    Service(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] StorageError),

    /// The records table rejected its options.
    #[error("Table error: {0}")]
    Table(#[from] TableError),
}

/// Result type alias for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

impl From<&str> for TuiError {
    fn from(msg: &str) -> Self {
        TuiError::Service(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_service_error() {
        let err: TuiError = "gateway down".into();
        assert_eq!(err.to_string(), "Service error: gateway down");
    }

    #[test]
    fn test_table_error_conversion() {
        let err: TuiError = TableError::InvalidPageSize(0).into();
        assert!(matches!(err, TuiError::Table(TableError::InvalidPageSize(0))));
    }
}
