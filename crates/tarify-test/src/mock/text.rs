//! Mock text provider for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tarify_core::{Result, ServiceHealth, SourceFile, TextProvider};

use super::{CallGauge, MockFailure};

/// Configuration for the mock text provider.
#[derive(Debug, Clone, Default)]
pub struct MockTextConfig {
    /// Canned text returned for every successful extraction.
    pub text: String,
    /// Base latency applied to every call.
    pub latency: Duration,
    /// Extra per-file latency, keyed by file name.
    pub delays: HashMap<String, Duration>,
    /// Per-file failure injection, keyed by file name.
    pub failures: HashMap<String, MockFailure>,
}

/// Mock text provider.
///
/// Returns the configured canned text after the configured latency, or
/// the injected failure for files listed in the failure map.
#[derive(Debug, Clone, Default)]
pub struct MockTextProvider {
    config: Arc<MockTextConfig>,
    gauge: Arc<CallGauge>,
}

impl MockTextProvider {
    /// Creates a new mock with the given configuration.
    pub fn new(config: MockTextConfig) -> Self {
        Self {
            config: Arc::new(config),
            gauge: Arc::new(CallGauge::new()),
        }
    }

    /// Creates a mock that returns the given text for every file.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(MockTextConfig {
            text: text.into(),
            ..Default::default()
        })
    }

    /// Shares an external gauge, e.g. with the structure mock.
    pub fn with_gauge(mut self, gauge: Arc<CallGauge>) -> Self {
        self.gauge = gauge;
        self
    }

    /// The gauge recording this mock's calls.
    pub fn gauge(&self) -> Arc<CallGauge> {
        Arc::clone(&self.gauge)
    }
}

#[async_trait::async_trait]
impl TextProvider for MockTextProvider {
    async fn extract_text(&self, file: &SourceFile) -> Result<String> {
        let _guard = self.gauge.enter(&file.file_name);

        let mut wait = self.config.latency;
        if let Some(extra) = self.config.delays.get(&file.file_name) {
            wait += *extra;
        }
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        if let Some(failure) = self.config.failures.get(&file.file_name) {
            return Err(failure.into_error());
        }

        Ok(self.config.text.clone())
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
