//! Text-extraction client configuration
//!
//! This module provides configuration structures and builders for the
//! text-extraction client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Configuration for the text-extraction client
///
/// Contains the settings needed to configure client behavior, including
/// the conversion mode, polling cadence, and wait deadline for the
/// asynchronous extraction job.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "WhispererBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct WhispererConfig {
    /// Base URL for the text-extraction API
    #[builder(setter(custom), default = "WhispererConfig::default_base_url()")]
    pub base_url: Url,
    /// Conversion mode requested from the service
    #[builder(default = "String::from(\"high_quality\")")]
    pub mode: String,
    /// Output mode requested from the service
    #[builder(default = "String::from(\"layout_preserving\")")]
    pub output_mode: String,
    /// Interval between status polls
    #[builder(default = "Duration::from_secs(2)")]
    pub poll_interval: Duration,
    /// Upper bound on the whole submit-poll-retrieve cycle
    #[builder(default = "Duration::from_secs(120)")]
    pub wait_timeout: Duration,
    /// Per-request timeout for individual HTTP calls
    #[builder(default = "Duration::from_secs(30)")]
    pub request_timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "WhispererConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for WhispererConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            mode: String::from("high_quality"),
            output_mode: String::from("layout_preserving"),
            poll_interval: Duration::from_secs(2),
            wait_timeout: Duration::from_secs(120),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl WhispererConfig {
    /// Create a new configuration builder
    pub fn builder() -> WhispererBuilder {
        WhispererBuilder::default()
    }

    fn default_base_url() -> Url {
        "https://llmwhisperer-api.us-central.unstract.com/api/v2"
            .parse()
            .expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("tarify-whisperer/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl WhispererBuilder {
    /// Set the base URL for the text-extraction API
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url =
            Some(url.parse().map_err(|e| {
                Error::invalid_config(format!("Invalid base URL '{}': {}", url, e))
            })?);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(poll_interval) = &self.poll_interval {
            if poll_interval.is_zero() {
                return Err("Poll interval must be greater than 0".to_string());
            }
        }

        if let Some(wait_timeout) = &self.wait_timeout {
            if wait_timeout.is_zero() {
                return Err("Wait timeout must be greater than 0".to_string());
            }
        }

        if let Some(request_timeout) = &self.request_timeout {
            if request_timeout.is_zero() {
                return Err("Request timeout must be greater than 0".to_string());
            }
        }

        if let (Some(poll_interval), Some(wait_timeout)) = (&self.poll_interval, &self.wait_timeout)
        {
            if poll_interval >= wait_timeout {
                return Err("Poll interval must be shorter than the wait timeout".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WhispererConfig::builder()
            .with_mode("form")
            .with_wait_timeout(Duration::from_secs(60))
            .with_poll_interval(Duration::from_secs(1))
            .build()
            .expect("Valid config");

        assert_eq!(config.mode, "form");
        assert_eq!(config.wait_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_default_config() {
        let config = WhispererConfig::default();

        assert_eq!(
            config.base_url.as_str(),
            "https://llmwhisperer-api.us-central.unstract.com/api/v2"
        );
        assert_eq!(config.mode, "high_quality");
        assert_eq!(config.output_mode, "layout_preserving");
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.wait_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = WhispererConfig::builder().with_base_url("not-a-valid-url");

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_wait_timeout() {
        let result = WhispererConfig::builder()
            .with_wait_timeout(Duration::ZERO)
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_poll_interval_exceeds_deadline() {
        let result = WhispererConfig::builder()
            .with_poll_interval(Duration::from_secs(10))
            .with_wait_timeout(Duration::from_secs(5))
            .build();

        assert!(result.is_err());
    }
}
