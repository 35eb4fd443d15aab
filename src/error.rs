//! Error types for Agrocast.
//!
//! This module provides a unified error type [`AgrocastError`] for all Agrocast
//! operations, along with a convenient [`Result`] type alias.
//!
//! # Error Categories
//!
//! Errors are organized into the following categories:
//!
//! - **Request validation**: malformed or incomplete prediction inputs
//! - **Capability**: a model/scaler pair is not loaded
//! - **Artifacts**: model or scaler files that are missing or unreadable
//! - **Inference**: shape mismatches and failures inside the numeric path
//! - **Configuration**: invalid settings or missing configuration
//!
//! # Example
//!
//! ```rust
//! use agrocast::error::{AgrocastError, Result};
//!
//! fn parse_reading(raw: &str) -> Result<f64> {
//!     raw.parse::<f64>()
//!         .map_err(|_| AgrocastError::InvalidInput(format!("not a number: {}", raw)))
//! }
//! ```
//!
//! # HTTP Integration
//!
//! Errors map to HTTP status codes at the endpoint boundary:
//!
//! ```rust
//! use agrocast::error::AgrocastError;
//! use axum::http::StatusCode;
//!
//! let err = AgrocastError::InvalidInput("missing field".into());
//! assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
//! ```

use crate::artifacts::Capability;
use axum::http::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Agrocast operations.
#[derive(Error, Debug)]
pub enum AgrocastError {
    // Request validation errors
    #[error("{0}")]
    InvalidInput(String),

    // Capability errors
    #[error("{0} model or scaler not loaded")]
    CapabilityUnavailable(Capability),

    // Artifact errors
    #[error("Artifact error at {path}: {reason}")]
    Artifact { path: PathBuf, reason: String },

    // Inference errors
    #[error("Shape mismatch: expected {expected} features, got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Inference failed: {0}")]
    Inference(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // External errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgrocastError {
    /// HTTP status code for this error at the endpoint boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AgrocastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if error is a client (request) error.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Message that may cross the HTTP boundary.
    ///
    /// Validation and missing-capability errors carry user-facing messages;
    /// everything else is internal and must be replaced with an opaque
    /// message by the caller.
    pub fn public_message(&self) -> Option<String> {
        match self {
            AgrocastError::InvalidInput(_) | AgrocastError::CapabilityUnavailable(_) => {
                Some(self.to_string())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AgrocastError {
    fn from(e: serde_json::Error) -> Self {
        AgrocastError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for AgrocastError {
    fn from(e: csv::Error) -> Self {
        AgrocastError::Csv(e.to_string())
    }
}

/// Result type alias for Agrocast operations.
pub type Result<T> = std::result::Result<T, AgrocastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AgrocastError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AgrocastError::CapabilityUnavailable(Capability::Soil).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AgrocastError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_public_message_hides_internal_details() {
        let err = AgrocastError::Inference("matrix blew up".into());
        assert!(err.public_message().is_none());

        let err = AgrocastError::CapabilityUnavailable(Capability::Weather);
        let msg = err.public_message().unwrap();
        assert!(msg.contains("model or scaler not loaded"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(AgrocastError::InvalidInput("x".into()).is_client_error());
        assert!(!AgrocastError::Internal("x".into()).is_client_error());
    }
}
