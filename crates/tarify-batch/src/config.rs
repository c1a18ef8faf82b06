//! Batch orchestration configuration.

use std::time::Duration;

use crate::error::{BatchError, Result};

/// Default number of concurrently processed files.
///
/// Tuned against the rate limits of the two remote services; raise it
/// only together with the account tier.
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Default number of files per dispatch wave.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Default upper bound on one file's pipeline, both remote calls included.
pub const DEFAULT_FILE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for one batch run.
///
/// Validated before any work is dispatched; see [`BatchConfig::validate`].
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum number of files processed concurrently within a chunk.
    pub max_concurrent: usize,
    /// Number of files per chunk; chunks are dispatched in sequence.
    pub chunk_size: usize,
    /// Per-file deadline covering both remote calls together.
    pub file_timeout: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            file_timeout: DEFAULT_FILE_TIMEOUT,
        }
    }
}

impl BatchConfig {
    /// Creates a configuration with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the concurrency limit.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    /// Sets the chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the per-file timeout.
    pub fn with_file_timeout(mut self, file_timeout: Duration) -> Self {
        self.file_timeout = file_timeout;
        self
    }

    /// Rejects configurations under which no file could ever complete.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`] for a zero concurrency limit,
    /// a zero chunk size, or a zero per-file timeout.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            return Err(BatchError::invalid_config(
                "max_concurrent must be greater than 0",
            ));
        }
        if self.chunk_size == 0 {
            return Err(BatchError::invalid_config(
                "chunk_size must be greater than 0",
            ));
        }
        if self.file_timeout.is_zero() {
            return Err(BatchError::invalid_config(
                "file_timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.chunk_size, 5);
        assert_eq!(config.file_timeout, Duration::from_secs(60));
    }

    #[test]
    fn zero_limits_rejected() {
        assert!(
            BatchConfig::default()
                .with_max_concurrent(0)
                .validate()
                .is_err()
        );
        assert!(BatchConfig::default().with_chunk_size(0).validate().is_err());
        assert!(
            BatchConfig::default()
                .with_file_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
