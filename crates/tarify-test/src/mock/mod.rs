//! Mock providers for testing.
//!
//! Both mocks implement the provider traits from tarify-core and are
//! driven entirely by their configuration: canned results, per-file
//! failure injection, per-file delays, and optional panics. A shared
//! [`CallGauge`] records call counts, call order, and the maximum number
//! of concurrently in-flight invocations.

mod gauge;
mod structure;
mod text;

pub use gauge::CallGauge;
pub use structure::{MockStructureConfig, MockStructureProvider};
pub use text::{MockTextConfig, MockTextProvider};

use tarify_core::Error;

/// Failure modes a mock can inject for a specific file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Provider reports a timeout (retryable).
    Timeout,
    /// Provider reports an unreadable document (not retryable).
    Unsupported,
    /// Provider reports a transport failure (retryable).
    Network,
    /// Provider reports an unparseable service reply (not retryable).
    Malformed,
    /// Provider panics mid-call.
    Panic,
}

impl MockFailure {
    /// Converts the failure mode into the matching provider error.
    ///
    /// Panics intentionally for [`MockFailure::Panic`]; callers use it to
    /// exercise worker isolation.
    pub fn into_error(self) -> Error {
        match self {
            Self::Timeout => Error::timeout().with_message("mock timeout"),
            Self::Unsupported => {
                Error::unsupported_document().with_message("mock unreadable document")
            }
            Self::Network => Error::network().with_message("mock connection reset"),
            Self::Malformed => Error::malformed_response().with_message("mock garbage reply"),
            Self::Panic => panic!("mock provider panic"),
        }
    }
}
