//! Shared Error Types
//!
//! This module defines the error types used across the client. Input
//! rejected before any request is sent is a `SharedError`; everything that
//! can go wrong while talking to the backend is an `ApiError`.
//!
//! # Error Categories
//!
//! - `SharedError::ValidationError` - Data validation failures
//! - `ApiError` - Transport, timeout, HTTP status and payload failures
//!
//! # Usage
//!
//! ```rust
//! use salama::shared::error::{ApiError, SharedError};
//!
//! let error = SharedError::validation("rtsp_url", "RTSP URL is required");
//! let api_error: ApiError = error.into();
//! assert!(api_error.user_message().contains("rtsp_url"));
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread boundaries.
use std::time::Duration;
use thiserror::Error;

/// Local errors that never involve the network
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failures surfaced by the backend HTTP client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// DNS failure, connection refused, reset before a response arrived
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The fixed request deadline elapsed
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Backend answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http {
        /// Response status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Response payload did not have the expected shape
    #[error("decode error: {0}")]
    Decode(String),

    /// Input rejected before any request was sent
    #[error(transparent)]
    Invalid(#[from] SharedError),
}

impl ApiError {
    /// Human-readable summary suitable for an inline error notice
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnreachable(_) => {
                "Network error. Please check your connection.".to_string()
            }
            ApiError::Timeout(_) => "Request timed out. Please try again.".to_string(),
            ApiError::Http { status, body } => {
                format!("HTTP error! status: {}, message: {}", status, body)
            }
            ApiError::Decode(detail) => format!("Unexpected response from server: {}", detail),
            ApiError::Invalid(err) => err.to_string(),
        }
    }

    /// HTTP status carried by the error, if the backend produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
