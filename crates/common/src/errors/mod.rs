//! Error types for ReservoirOS
//!
//! Provides the client-side error taxonomy:
//! - Transport failures (network, timeout, non-2xx status)
//! - Validation failures detected before any remote call
//! - Configuration and decoding problems
//!
//! Reference resolution misses are not errors and have no variant here.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,

    // Resource errors (4xxx)
    NotFound,

    // External service errors (8xxx)
    TransportError,
    UpstreamError,
    DecodeError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,

            ErrorCode::NotFound => 4001,

            ErrorCode::TransportError => 8001,
            ErrorCode::UpstreamError => 8002,
            ErrorCode::DecodeError => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    // Resource errors
    #[error("Resource not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    // Transport errors
    #[error("Request to {action} failed{}: {message}", status_suffix(.status))]
    Transport {
        action: String,
        status: Option<StatusCode>,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    // Internal errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

fn status_suffix(status: &Option<StatusCode>) -> String {
    status
        .map(|s| format!(" with status {}", s.as_u16()))
        .unwrap_or_default()
}

impl AppError {
    /// Build a transport error for a failed remote action
    pub fn transport(action: impl Into<String>, status: Option<StatusCode>, message: impl Into<String>) -> Self {
        AppError::Transport {
            action: action.into(),
            status,
            message: message.into(),
        }
    }

    /// Build a validation error for a form field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        AppError::Validation {
            message: message.into(),
            field: Some(field),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::Transport { .. } => ErrorCode::TransportError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Decode(_) => ErrorCode::DecodeError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// HTTP status reported by the remote API, if the call got that far
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Transport { status, .. } => *status,
            AppError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            AppError::HttpClient(e) => e.status(),
            _ => None,
        }
    }

    /// Remote call could not complete. Left for the user to retry.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::Transport { .. }
                | AppError::NotFound { .. }
                | AppError::HttpClient(_)
                | AppError::Decode(_)
        )
    }

    /// Detected client-side before any remote call
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. } | AppError::MissingField { .. })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();

        AppError::Validation {
            message: format!("required fields missing: {}", fields.join(", ")),
            field: fields.first().map(|f| f.to_string()),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::NotFound {
            resource: "reservoir".into(),
            id: "7".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(err.is_transport());
    }

    #[test]
    fn test_validation_error() {
        let err = AppError::validation("name", "Name is required");
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(err.is_validation());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_transport_message_includes_status() {
        let err = AppError::transport("create well target", Some(StatusCode::BAD_GATEWAY), "upstream down");
        let message = err.to_string();
        assert!(message.contains("create well target"));
        assert!(message.contains("502"));
        assert_eq!(err.code().as_code(), 8001);
    }

    #[test]
    fn test_transport_without_status() {
        let err = AppError::transport("list projects", None, "connection refused");
        assert_eq!(err.to_string(), "Request to list projects failed: connection refused");
        assert_eq!(err.status(), None);
    }
}
