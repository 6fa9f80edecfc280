//! Error types module
//!
//! All failures that can reach a client are unified under [`AppError`]. Each
//! variant describes its own HTTP presentation through [`ErrorMetadata`], so
//! the API layer never has to match on variants to choose a status code.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like upstream hiccups
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNSUPPORTED_MEDIA_TYPE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Too many files: {count} uploaded, at most {max} allowed")]
    TooManyFiles { count: usize, max: usize },

    #[error("No public_id provided")]
    MissingIdentifier,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::UnsupportedMediaType(_) => (
            415,
            "UNSUPPORTED_MEDIA_TYPE",
            false,
            Some("Upload JPEG, PNG or MP4 files only"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::TooManyFiles { .. } => (
            400,
            "TOO_MANY_FILES",
            false,
            Some("Upload fewer files per request"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingIdentifier => (
            400,
            "MISSING_IDENTIFIER",
            false,
            Some("Provide the external id of the media to delete"),
            false,
            LogLevel::Debug,
        ),
        AppError::ExternalService(_) => (
            502,
            "EXTERNAL_SERVICE_ERROR",
            true,
            Some("Retry after a short delay"),
            false,
            LogLevel::Warn,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::TooManyFiles { .. } => "TooManyFiles",
            AppError::MissingIdentifier => "MissingIdentifier",
            AppError::ExternalService(_) => "ExternalServiceError",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UnsupportedMediaType(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::TooManyFiles { count, max } => format!(
                "Too many files: {} uploaded, at most {} allowed",
                count, max
            ),
            AppError::MissingIdentifier => "No public_id provided".to_string(),
            AppError::ExternalService(ref msg) => msg.clone(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
