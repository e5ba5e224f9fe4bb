use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("CliError: {0}")]
    Cli(#[from] CliError),
    #[error("ApiError: {0}")]
    Api(#[from] ApiError),
    #[error("StorageError: {0}")]
    Storage(#[from] StorageError),
    #[error("TableError: {0}")]
    Table(#[from] TableError),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Output error: {0}")]
    Output(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64, endpoint: String },
    #[error("HTTP error: {status} {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },
    #[error("Malformed response from {endpoint}: {message}")]
    Parse { endpoint: String, message: String },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Timeout { endpoint, .. }
            | ApiError::Http { endpoint, .. }
            | ApiError::Parse { endpoint, .. } => endpoint,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File I/O error at {path}: {source}")]
    FileIo {
        path: String,
        source: std::io::Error,
    },
    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },
    #[error("Configuration directory not found")]
    ConfigDirNotFound,
    #[error("Log setup failed: {message}")]
    LogInit { message: String },
}

/// Errors raised by the table widgets.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Fetch failed: {0}")]
    FetchFailed(ApiError),
    /// A response arrived for a request that has since been superseded.
    #[error("Discarded stale response #{seq} (latest request is #{latest})")]
    StaleResponse { seq: u64, latest: u64 },
    #[error("Page size must be positive, got {0}")]
    InvalidPageSize(u64),
    #[error("Field '{0}' is configured more than once")]
    DuplicateField(String),
    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl ErrorSeverity {
    pub fn emoji(&self) -> &'static str {
        match self {
            ErrorSeverity::Critical => "🚨",
            ErrorSeverity::High => "❌",
            ErrorSeverity::Medium => "⚠️",
            ErrorSeverity::Low => "ℹ️",
        }
    }
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Cli(_) => ErrorSeverity::Medium,
            AppError::Api(api_error) => match api_error {
                ApiError::Timeout { .. } => ErrorSeverity::Medium,
                ApiError::Http { status, .. } if *status >= 500 => ErrorSeverity::High,
                ApiError::Http { status: 0, .. } => ErrorSeverity::High,
                _ => ErrorSeverity::Medium,
            },
            AppError::Storage(_) => ErrorSeverity::Medium,
            AppError::Table(TableError::StaleResponse { .. }) => ErrorSeverity::Low,
            AppError::Table(_) => ErrorSeverity::Medium,
        }
    }

    pub fn troubleshooting_hint(&self) -> Option<String> {
        match self {
            AppError::Api(ApiError::Timeout { .. }) => {
                Some("Check that the gateway is reachable and try again".to_string())
            }
            AppError::Api(ApiError::Http { status: 0, .. }) => Some(
                "Gateway unreachable. Set the URL with 'dwc-cli config set --url <url>' or DWCV_URL"
                    .to_string(),
            ),
            AppError::Api(ApiError::Http { status: 404, .. }) => {
                Some("'dwc-cli fields' lists the fields the gateway knows about".to_string())
            }
            AppError::Storage(StorageError::ConfigParseError { .. }) => {
                Some("Fix or remove ~/.config/dwc-views/config.toml".to_string())
            }
            _ => None,
        }
    }
}
