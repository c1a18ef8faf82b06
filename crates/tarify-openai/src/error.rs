//! Error types for tarify-openai
//!
//! This module provides error handling for the structured-extraction client.

/// Result type for all structured-extraction operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for structured-extraction operations
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

    /// Inference API error response
    #[error("Inference API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The reply envelope or its content could not be parsed
    #[error("Malformed inference response: {reason}")]
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

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(err) => err.is_timeout() || err.is_connect(),
            Error::ApiError { status, .. } => *status >= 500 || *status == 429,
            Error::RateLimited => true,
            _ => false,
        }
    }
}

// Import builder error type for From implementation
use crate::client::OpenAiBuilderError;

impl From<OpenAiBuilderError> for Error {
    fn from(err: OpenAiBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::api_error(500, "boom").is_retryable());
        assert!(Error::api_error(429, "slow down").is_retryable());
        assert!(Error::RateLimited.is_retryable());

        assert!(!Error::api_error(401, "bad key").is_retryable());
        assert!(!Error::malformed_response("not json").is_retryable());
        assert!(!Error::auth_error("no key").is_retryable());
    }
}
