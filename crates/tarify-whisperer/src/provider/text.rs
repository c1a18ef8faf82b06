//! Text provider implementation.
//!
//! Implements the [`TextProvider`] trait for the LLMWhisperer client,
//! mapping crate-local errors into the shared error taxonomy.

use tarify_core::{ServiceHealth, SourceFile, TextProvider};

use crate::client::WhispererClient;
use crate::error::Error;
use crate::TRACING_TARGET_PROVIDER;

/// LLMWhisperer-backed text provider.
///
/// Thin adapter over [`WhispererClient`] that exposes it behind the
/// provider seam of the batch pipeline.
#[derive(Debug, Clone)]
pub struct WhispererTextProvider {
    client: WhispererClient,
}

impl WhispererTextProvider {
    /// Creates a new text provider from a configured client.
    pub fn new(client: WhispererClient) -> Self {
        Self { client }
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &WhispererClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl TextProvider for WhispererTextProvider {
    async fn extract_text(&self, file: &SourceFile) -> tarify_core::Result<String> {
        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            file_name = %file.file_name,
            size = file.len(),
            "Extracting text"
        );

        self.client
            .extract_text(&file.file_name, file.content.clone())
            .await
            .map_err(into_core_error)
    }

    async fn health_check(&self) -> tarify_core::Result<ServiceHealth> {
        match self.client.health_check().await {
            Ok(()) => Ok(ServiceHealth::healthy()),
            Err(error) => Ok(ServiceHealth::unhealthy(error.to_string())),
        }
    }
}

/// Maps a client error onto the shared error taxonomy.
fn into_core_error(error: Error) -> tarify_core::Error {
    let message = error.to_string();
    let core = match &error {
        Error::Timeout { .. } => tarify_core::Error::timeout(),
        Error::Http(e) if e.is_timeout() => tarify_core::Error::timeout(),
        Error::Http(_) => tarify_core::Error::network(),
        Error::RateLimited => tarify_core::Error::rate_limited(),
        Error::ApiError { status, .. } if *status == 429 => tarify_core::Error::rate_limited(),
        Error::ApiError { status, .. } if *status >= 500 => {
            tarify_core::Error::service_unavailable()
        }
        Error::ApiError { .. } => tarify_core::Error::external(),
        Error::UnsupportedDocument { .. } | Error::ExtractionFailed { .. } => {
            tarify_core::Error::unsupported_document()
        }
        Error::MalformedResponse { .. } | Error::Serialization(_) => {
            tarify_core::Error::malformed_response()
        }
        Error::AuthError { .. } => tarify_core::Error::missing_credential(),
        Error::InvalidConfig { .. } | Error::UrlParse(_) => tarify_core::Error::configuration(),
    };
    core.with_message(message).with_source(error)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use tarify_core::ErrorKind;

    #[test]
    fn test_error_mapping_preserves_retryability() {
        let timeout = into_core_error(Error::timeout(Duration::from_secs(60)));
        assert_eq!(timeout.kind, ErrorKind::Timeout);
        assert!(timeout.is_retryable());

        let unreadable = into_core_error(Error::unsupported_document("a.pdf", "not a pdf"));
        assert_eq!(unreadable.kind, ErrorKind::UnsupportedDocument);
        assert!(!unreadable.is_retryable());

        let server = into_core_error(Error::api_error(503, "down"));
        assert_eq!(server.kind, ErrorKind::ServiceUnavailable);
        assert!(server.is_retryable());
    }
}
