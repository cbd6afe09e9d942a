//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Layers
//!
//! - **TransportError**: typed outcome of one LLM call. Always absorbed by the
//!   orchestrator and turned into a fallback, never shown to callers.
//! - **SlideError**: application error. Only `InvalidInput` and unexpected
//!   internal faults reach the caller.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Transport Error
// =============================================================================

/// Typed failure of a single transport call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Credential rejected by the vendor (401/403)
    #[error("unauthorized (status {status})")]
    Unauthorized { status: u16 },

    /// Vendor rate limit hit (429)
    #[error("rate limited")]
    RateLimited,

    /// Any other non-success status
    #[error("server error (status {status}): {body}")]
    ServerError { status: u16, body: String },

    /// Connection, DNS or TLS failure
    #[error("network error: {0}")]
    NetworkError(String),

    /// Deadline passed before the call completed
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Response arrived but could not be understood
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl TransportError {
    /// HTTP status carried by the failure, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status } => Some(*status),
            Self::RateLimited => Some(429),
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

// =============================================================================
// Status Classifier
// =============================================================================

/// Maps raw HTTP/client failures onto `TransportError`
pub struct StatusClassifier;

impl StatusClassifier {
    /// Classify a non-success HTTP status code
    pub fn classify_http_status(status: u16, body: impl Into<String>) -> TransportError {
        match status {
            401 | 403 => TransportError::Unauthorized { status },
            429 => TransportError::RateLimited,
            _ => TransportError::ServerError {
                status,
                body: body.into(),
            },
        }
    }

    /// Classify a `reqwest` client error
    pub fn classify_reqwest(err: &reqwest::Error, timeout: Duration) -> TransportError {
        if err.is_timeout() {
            return TransportError::Timeout(timeout);
        }
        if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() || err.is_body() {
            return TransportError::MalformedResponse(err.to_string());
        }
        TransportError::NetworkError(err.to_string())
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SlideError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Request Errors
    // -------------------------------------------------------------------------
    /// Bad request shape, surfaced to the caller as a 400
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // LLM Errors
    // -------------------------------------------------------------------------
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    // -------------------------------------------------------------------------
    // Setup / Internal Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// Unexpected fault anywhere in the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SlideError>;

impl SlideError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the failure is the caller's fault (400-class)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Sanitized message safe to show to end users
    pub fn user_message(&self) -> String {
        if let Self::InvalidInput(message) = self {
            return message.clone();
        }

        let raw = self.to_string().to_lowercase();
        if raw.contains("api_key") || raw.contains("api key") || raw.contains("credential") {
            "AI service is misconfigured, please contact the administrator".to_string()
        } else if raw.contains("quota") {
            "AI service usage limit reached, please try again later".to_string()
        } else if raw.contains("network") {
            "Network connection failed, please check your connection and retry".to_string()
        } else {
            "Parsing failed, please try again later".to_string()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
