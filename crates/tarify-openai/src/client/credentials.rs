//! Authentication credentials
//!
//! This module provides authentication credential types and constructors
//! for the chat-completion client.

/// Authentication credentials for the inference service
///
/// The OpenAI API authenticates with a bearer token carried in the
/// `Authorization` header.
#[derive(Debug, Clone)]
pub enum OpenAiCredentials {
    /// API key used as a bearer token
    ApiKey(String),
    /// No authentication (for testing/development)
    None,
}

impl OpenAiCredentials {
    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create credentials with no authentication
    pub fn none() -> Self {
        Self::None
    }

    /// Whether a usable credential is present
    pub fn is_configured(&self) -> bool {
        match self {
            Self::ApiKey(key) => !key.is_empty(),
            Self::None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials() {
        assert!(OpenAiCredentials::api_key("sk-test").is_configured());
        assert!(!OpenAiCredentials::api_key("").is_configured());
        assert!(!OpenAiCredentials::none().is_configured());
    }
}
