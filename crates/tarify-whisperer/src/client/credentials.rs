//! Authentication credentials
//!
//! This module provides authentication credential types and constructors
//! for the text-extraction client.

/// Authentication credentials for the text-extraction service
///
/// The LLMWhisperer API authenticates with a per-account API key carried
/// in the `unstract-key` request header.
#[derive(Debug, Clone)]
pub enum WhispererCredentials {
    /// API key authentication
    ApiKey(String),
    /// No authentication (for testing/development)
    None,
}

impl WhispererCredentials {
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
        let api_key = WhispererCredentials::api_key("test-key");
        match &api_key {
            WhispererCredentials::ApiKey(key) => assert_eq!(key, "test-key"),
            _ => panic!("Expected API key credentials"),
        }
        assert!(api_key.is_configured());

        assert!(!WhispererCredentials::none().is_configured());
        assert!(!WhispererCredentials::api_key("").is_configured());
    }
}
