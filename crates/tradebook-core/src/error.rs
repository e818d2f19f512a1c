//! Error types for tradebook-core
//!
//! This module provides error handling for the core ledger record engine,
//! including error codes, detailed messages, and suggestions.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tradebook_store::StoreError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    RecordNotFound,
    /// Validation error
    ValidationError,
    /// Storage error
    StorageError,
    /// Configuration error
    ConfigError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::RecordNotFound => write!(f, "RECORD_NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for presentation layers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Debug information
    Debug,
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for tradebook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record not found: {id}")]
    RecordNotFound { id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Storage error")]
    StorageError(#[from] StoreError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::StorageError(_) => ErrorCode::StorageError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::RecordNotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::StorageError(_) => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::RecordNotFound { id } => {
                details = details.with_detail(serde_json::json!({ "id": id }));
                details = details.with_suggestion(
                    "The record may have been deleted from another view; refresh and retry."
                        .to_string(),
                );
            }
            CoreError::ValidationError { message } => {
                details =
                    details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details.with_suggestion(
                    "Fill in the named field(s) and save again.".to_string(),
                );
            }
            CoreError::StorageError(inner) => {
                details = details.with_detail(serde_json::json!({ "store": inner.to_string() }));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, operation: &str);
    /// Log a warning
    fn log_warning(&self, message: &str, operation: &str);
}

/// Default error logger using the log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, operation: &str) {
        log::error!(
            target: "tradebook::error",
            "ERROR [{}] {} - Operation: {}",
            error.code(),
            error.to_details(),
            operation
        );
    }

    fn log_warning(&self, message: &str, operation: &str) {
        log::warn!(
            target: "tradebook::error",
            "WARNING: {} - Operation: {}",
            message,
            operation
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::RecordNotFound.to_string(), "RECORD_NOT_FOUND");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::StorageError.to_string(), "STORAGE_ERROR");
    }

    #[test]
    fn test_core_error_code() {
        let error = CoreError::RecordNotFound {
            id: "rec-1".to_string(),
        };
        assert_eq!(error.code(), ErrorCode::RecordNotFound);

        let error = CoreError::ValidationError {
            message: "counterparty".to_string(),
        };
        assert_eq!(error.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_core_error_severity() {
        let error = CoreError::RecordNotFound {
            id: "rec-1".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Info);

        let error = CoreError::ConfigError {
            message: "test".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_details_record_not_found() {
        let error = CoreError::RecordNotFound {
            id: "rec-42".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::RecordNotFound);
        assert!(!details.suggestions.is_empty());
        assert!(details.message.contains("rec-42"));
    }

    #[test]
    fn test_error_details_builder() {
        let details = ErrorDetails::new(
            ErrorCode::ValidationError,
            "Validation failed".to_string(),
        )
        .with_detail(serde_json::json!({"field": "base_amount"}))
        .with_suggestion("Check the value".to_string());

        assert_eq!(details.code, ErrorCode::ValidationError);
        assert!(details.details.is_some());
        assert_eq!(details.suggestions.len(), 1);
    }
}
