//! Mock structure provider for testing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tarify_core::{InvoiceRecord, Result, ServiceHealth, StructureProvider};

use super::{CallGauge, MockFailure};

/// Configuration for the mock structure provider.
#[derive(Debug, Clone, Default)]
pub struct MockStructureConfig {
    /// Template record returned for every successful call.
    pub record: InvoiceRecord,
    /// Per-file record overrides, keyed by file name.
    pub records: HashMap<String, InvoiceRecord>,
    /// Base latency applied to every call.
    pub latency: Duration,
    /// Extra per-file latency, keyed by file name.
    pub delays: HashMap<String, Duration>,
    /// Per-file failure injection, keyed by file name.
    pub failures: HashMap<String, MockFailure>,
}

/// Mock structure provider.
///
/// Returns the configured record (the per-file override when present,
/// the template otherwise) after the configured latency, or the injected
/// failure for files listed in the failure map.
#[derive(Debug, Clone, Default)]
pub struct MockStructureProvider {
    config: Arc<MockStructureConfig>,
    gauge: Arc<CallGauge>,
}

impl MockStructureProvider {
    /// Creates a new mock with the given configuration.
    pub fn new(config: MockStructureConfig) -> Self {
        Self {
            config: Arc::new(config),
            gauge: Arc::new(CallGauge::new()),
        }
    }

    /// Creates a mock that returns the given record for every file.
    pub fn with_record(record: InvoiceRecord) -> Self {
        Self::new(MockStructureConfig {
            record,
            ..Default::default()
        })
    }

    /// Shares an external gauge, e.g. with the text mock.
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
impl StructureProvider for MockStructureProvider {
    async fn structure(&self, file_name: &str, _text: &str) -> Result<InvoiceRecord> {
        let _guard = self.gauge.enter(file_name);

        let mut wait = self.config.latency;
        if let Some(extra) = self.config.delays.get(file_name) {
            wait += *extra;
        }
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        if let Some(failure) = self.config.failures.get(file_name) {
            return Err(failure.into_error());
        }

        match self.config.records.get(file_name) {
            Some(record) => Ok(record.clone()),
            None => Ok(self.config.record.clone()),
        }
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}
