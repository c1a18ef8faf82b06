//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error as ThisError;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source slot in [`Error`] so that client crates can attach
/// their own error types without this crate depending on them.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of errors that can occur at the provider boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Network-level failure reaching the remote service.
    Network,
    /// The operation did not complete within its deadline.
    Timeout,
    /// Rate limit exceeded on the remote service.
    RateLimited,
    /// Remote service reported a server-side fault.
    ServiceUnavailable,
    /// The document cannot be processed (unreadable, wrong format).
    UnsupportedDocument,
    /// The remote service returned a response we could not parse.
    MalformedResponse,
    /// A required API credential is not configured.
    MissingCredential,
    /// Invalid client or batch configuration.
    Configuration,
    /// Unclassified external service error.
    External,
}

/// A structured error type for provider operations.
#[derive(Debug, ThisError)]
#[error("{}{}", kind.as_ref(), message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new network error.
    pub fn network() -> Self {
        Self::new(ErrorKind::Network)
    }

    /// Creates a new timeout error.
    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    /// Creates a new rate limited error.
    pub fn rate_limited() -> Self {
        Self::new(ErrorKind::RateLimited)
    }

    /// Creates a new service unavailable error.
    pub fn service_unavailable() -> Self {
        Self::new(ErrorKind::ServiceUnavailable)
    }

    /// Creates a new unsupported document error.
    pub fn unsupported_document() -> Self {
        Self::new(ErrorKind::UnsupportedDocument)
    }

    /// Creates a new malformed response error.
    pub fn malformed_response() -> Self {
        Self::new(ErrorKind::MalformedResponse)
    }

    /// Creates a new missing credential error.
    pub fn missing_credential() -> Self {
        Self::new(ErrorKind::MissingCredential)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new external service error.
    pub fn external() -> Self {
        Self::new(ErrorKind::External)
    }

    /// Whether retrying the same operation may succeed.
    ///
    /// Transient conditions (network faults, timeouts, throttling, remote
    /// 5xx) are retryable; everything tied to the document or the local
    /// configuration is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Network
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::ServiceUnavailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(Error::timeout().is_retryable());
        assert!(Error::network().is_retryable());
        assert!(Error::rate_limited().is_retryable());
        assert!(Error::service_unavailable().is_retryable());

        assert!(!Error::unsupported_document().is_retryable());
        assert!(!Error::malformed_response().is_retryable());
        assert!(!Error::missing_credential().is_retryable());
        assert!(!Error::configuration().is_retryable());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::timeout().with_message("no result after 60s");
        assert_eq!(error.to_string(), "timeout: no result after 60s");

        let bare = Error::network();
        assert_eq!(bare.to_string(), "network");
    }
}
