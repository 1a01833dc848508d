//! Error types module
//!
//! All expected failure paths in the application are represented by the
//! `AppError` enum. Every variant carries a numeric error code in the form
//! `HTTP_STATUS * 10000 + SPECIFIC_CODE` (e.g. `4040002` for "user not
//! found"); the HTTP status a variant maps to is always `code / 10000`.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so non-database crates can depend on this one without pulling in
//! sqlx.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response characteristics.
pub trait ErrorMetadata {
    /// Numeric error code (`HTTP_STATUS * 10000 + SPECIFIC_CODE`)
    fn error_code(&self) -> u32;

    /// HTTP status code to return, derived from the numeric code
    fn http_status_code(&self) -> u16 {
        (self.error_code() / 10000) as u16
    }

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation error: {}", err))
    }
}

/// Static metadata for each variant: (numeric_code, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u32, bool, LogLevel) {
    match err {
        AppError::Database(_) => (5000001, true, LogLevel::Error),
        AppError::Validation(_) => (4000001, false, LogLevel::Debug),
        AppError::InvalidCredentials(_) => (4010001, false, LogLevel::Debug),
        AppError::Unauthorized(_) => (4010002, false, LogLevel::Debug),
        AppError::NotFound(_) => (4040001, false, LogLevel::Debug),
        AppError::UserNotFound(_) => (4040002, false, LogLevel::Debug),
        AppError::AlreadyExists(_) => (4090001, false, LogLevel::Debug),
        AppError::Upload(_) => (5000000, true, LogLevel::Error),
        AppError::Internal(_) => (5000000, true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (5000000, true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Validation(_) => "Validation",
            AppError::InvalidCredentials(_) => "InvalidCredentials",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::NotFound(_) => "NotFound",
            AppError::UserNotFound(_) => "UserNotFound",
            AppError::AlreadyExists(_) => "AlreadyExists",
            AppError::Upload(_) => "Upload",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the error chain
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
    fn error_code(&self) -> u32 {
        app_error_static_metadata(self).0
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Validation(ref msg) => msg.clone(),
            AppError::InvalidCredentials(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::UserNotFound(ref msg) => msg.clone(),
            AppError::AlreadyExists(ref msg) => msg.clone(),
            AppError::Upload(_) => "Photo upload failed".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.error_code(), 5000001);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_user_not_found() {
        let err = AppError::UserNotFound("user not found".to_string());
        assert_eq!(err.error_code(), 4040002);
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.client_message(), "user not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_upload_hides_detail() {
        let err = AppError::Upload("connection reset by bucket".to_string());
        assert_eq!(err.error_code(), 5000000);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Photo upload failed");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_http_status_derived_from_code() {
        assert_eq!(
            AppError::Validation("bad".into()).http_status_code(),
            400
        );
        assert_eq!(
            AppError::InvalidCredentials("nope".into()).http_status_code(),
            401
        );
        assert_eq!(
            AppError::AlreadyExists("dup".into()).http_status_code(),
            409
        );
    }
}
