//! Error types module
//!
//! All failures are unified under the `AppError` enum. Each variant knows its
//! HTTP status, a machine-readable type, the log level it should be reported
//! at, and the message that may be shown to callers. Internal failures keep
//! their details server-side; callers get a generic message.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream/caller-input issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller supplied a missing or invalid file, URL, or content type (400)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller-provided image URL was unreachable or returned non-success (400)
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// The server is missing required configuration, e.g. the API credential (500)
    #[error("Server configuration error: {0}")]
    Config(String),

    /// The vision model's reply violated the requested JSON contract (500)
    #[error("Model contract violation: {0}")]
    ModelContract(String),

    /// Filesystem failure while storing an upload (500, details logged only)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unexpected internal failure (500, details logged only)
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// HTTP status code to return
    pub fn http_status_code(&self) -> u16 {
        match self {
            AppError::InvalidInput(_) | AppError::UpstreamFetch(_) => 400,
            AppError::Config(_)
            | AppError::ModelContract(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => 500,
        }
    }

    /// Machine-readable error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::UpstreamFetch(_) => "UpstreamFetch",
            AppError::Config(_) => "Config",
            AppError::ModelContract(_) => "ModelContract",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::InvalidInput(_) => LogLevel::Debug,
            AppError::UpstreamFetch(_) => LogLevel::Warn,
            AppError::Config(_)
            | AppError::ModelContract(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::InternalWithSource { .. } => LogLevel::Error,
        }
    }

    /// Client-facing message (may differ from the internal error message)
    ///
    /// Storage and internal failures surface a generic message; their details
    /// are logged server-side only.
    pub fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::UpstreamFetch(msg)
            | AppError::Config(msg)
            | AppError::ModelContract(msg) => msg.clone(),
            AppError::Storage(_) => "Failed to store file".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
