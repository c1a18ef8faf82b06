//! Chat-completion client configuration
//!
//! This module provides configuration structures and builders for the
//! chat-completion client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Default model used for structured extraction.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for the chat-completion client
///
/// Generation settings are deliberately not configurable: extraction runs
/// with temperature 0 and a JSON response format so that repeated runs
/// over the same text stay comparable.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "OpenAiBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct OpenAiConfig {
    /// Base URL for the inference API
    #[builder(setter(custom), default = "OpenAiConfig::default_base_url()")]
    pub base_url: Url,
    /// Model identifier, e.g. "gpt-4o-mini"
    #[builder(default = "String::from(DEFAULT_MODEL)")]
    pub model: String,
    /// Upper bound on generated tokens, if any
    #[builder(default)]
    pub max_tokens: Option<u32>,
    /// Per-request timeout
    #[builder(default = "Duration::from_secs(60)")]
    pub request_timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "OpenAiConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            model: String::from(DEFAULT_MODEL),
            max_tokens: None,
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl OpenAiConfig {
    /// Create a new configuration builder
    pub fn builder() -> OpenAiBuilder {
        OpenAiBuilder::default()
    }

    /// Whether the configured model is a reasoning model.
    ///
    /// Reasoning models reject the temperature parameter, so the client
    /// omits it for them.
    pub fn is_reasoning_model(&self) -> bool {
        matches!(
            self.model.split('-').next(),
            Some("o1") | Some("o3") | Some("o4")
        )
    }

    fn default_base_url() -> Url {
        "https://api.openai.com/v1".parse().expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("tarify-openai/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl OpenAiBuilder {
    /// Set the base URL for the inference API
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url =
            Some(url.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid base URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err("Model must not be empty".to_string());
            }
        }

        if let Some(request_timeout) = &self.request_timeout {
            if request_timeout.is_zero() {
                return Err("Request timeout must be greater than 0".to_string());
            }
        }

        if let Some(Some(max_tokens)) = &self.max_tokens {
            if *max_tokens == 0 {
                return Err("Max tokens must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OpenAiConfig::default();

        assert_eq!(config.base_url.as_str(), "https://api.openai.com/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.max_tokens.is_none());
        assert!(!config.is_reasoning_model());
    }

    #[test]
    fn test_config_builder() {
        let config = OpenAiConfig::builder()
            .with_model("gpt-4o")
            .with_max_tokens(2048u32)
            .with_request_timeout(Duration::from_secs(30))
            .build()
            .expect("Valid config");

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_reasoning_model_detection() {
        let config = OpenAiConfig::builder()
            .with_model("o4-mini")
            .build()
            .expect("Valid config");
        assert!(config.is_reasoning_model());

        let config = OpenAiConfig::builder()
            .with_model("o1-mini")
            .build()
            .expect("Valid config");
        assert!(config.is_reasoning_model());

        let config = OpenAiConfig::builder()
            .with_model("gpt-4o-mini")
            .build()
            .expect("Valid config");
        assert!(!config.is_reasoning_model());
    }

    #[test]
    fn test_validation_empty_model() {
        let result = OpenAiConfig::builder().with_model("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_max_tokens() {
        let result = OpenAiConfig::builder().with_max_tokens(0u32).build();
        assert!(result.is_err());
    }
}
