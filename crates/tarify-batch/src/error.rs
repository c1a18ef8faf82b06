//! Batch orchestration error types.
//!
//! Only conditions outside any single file's scope surface here. Errors
//! inside one file's pipeline are captured into that file's
//! [`FileResult`](tarify_core::FileResult) and never abort the batch.

use std::borrow::Cow;

/// Result type alias for batch operations.
pub type Result<T, E = BatchError> = std::result::Result<T, E>;

/// Batch-aborting error type.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The batch configuration is unusable; nothing was dispatched.
    #[error("invalid batch configuration: {reason}")]
    InvalidConfig { reason: Cow<'static, str> },
}

impl BatchError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
