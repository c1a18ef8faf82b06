//! Error types for tarify-whisperer
//!
//! This module provides error handling for the text-extraction client.

use std::time::Duration;

/// Result type for all text-extraction operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for text-extraction operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The extraction job did not complete within the wait deadline
    #[error("Text extraction timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Extraction API error response
    #[error("Extraction API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The service rejected the document as unprocessable
    #[error("Unsupported document '{document}': {reason}")]
    UnsupportedDocument { document: String, reason: String },

    /// The service reported the conversion job as failed
    #[error("Extraction failed for '{document}': {reason}")]
    ExtractionFailed { document: String, reason: String },

    /// The service response is missing the expected payload
    #[error("Malformed service response: {reason}")]
    MalformedResponse { reason: String },

    /// Authentication/authorization error
    #[error("Authentication failed: {reason}")]
    AuthError { reason: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an API error
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create an unsupported document error
    pub fn unsupported_document(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedDocument {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Create an extraction failed error
    pub fn extraction_failed(document: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            document: document.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Create an authentication error
    pub fn auth_error(reason: impl Into<String>) -> Self {
        Self::AuthError {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a timeout error with the given duration
    pub fn timeout(duration: Duration) -> Self {
        Self::Timeout { timeout: duration }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::Timeout { .. } => true,
            Error::ApiError { status, .. } => *status >= 500 || *status == 429,
            Error::RateLimited => true,
            _ => false,
        }
    }
}

// Import builder error type for From implementation
use crate::client::WhispererBuilderError;

impl From<WhispererBuilderError> for Error {
    fn from(err: WhispererBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}
