//! # Error Types
//!
//! This module defines error types used throughout the dada-relay service.

use axum::http::StatusCode;
use thiserror::Error;

/// Generic message returned to callers for any internal failure.
///
/// Internal detail (upstream status codes, remote error bodies, transport
/// errors) is logged server-side and never included in HTTP responses.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Main error type for dada-relay operations
#[derive(Debug, Error)]
pub enum DadaError {
    /// Missing or empty required request field (client-caused)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Art generation call failed or returned unusable content
    #[error("Generation error: {0}")]
    Generation(String),

    /// Printer gateway unreachable or rejected the job
    #[error("Relay error: {0}")]
    Relay(String),

    /// Invalid or missing configuration at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Outbound HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DadaError {
    /// HTTP status this error maps to when surfaced to a caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            DadaError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Caller-safe message. Validation errors are descriptive; everything
    /// else collapses to a generic message.
    pub fn public_message(&self) -> String {
        match self {
            DadaError::Validation(msg) => msg.clone(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}
