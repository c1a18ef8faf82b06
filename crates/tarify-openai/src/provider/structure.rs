//! Structure provider implementation.
//!
//! Implements the [`StructureProvider`] trait for the OpenAI client,
//! combining the fixed schema prompt, the chat call, and the lenient
//! record parser.

use tarify_core::{InvoiceRecord, ServiceHealth, StructureProvider};

use crate::TRACING_TARGET_PROVIDER;
use crate::client::OpenAiClient;
use crate::error::Error;
use crate::parse::parse_record;
use crate::prompt::EXTRACTION_PROMPT;

/// OpenAI-backed structure provider.
///
/// Sends extracted invoice text to the chat-completions API with the fixed
/// field-schema prompt and parses the deterministic JSON reply into an
/// [`InvoiceRecord`].
#[derive(Debug, Clone)]
pub struct OpenAiStructureProvider {
    client: OpenAiClient,
    prompt: String,
}

impl OpenAiStructureProvider {
    /// Creates a new structure provider with the built-in schema prompt.
    pub fn new(client: OpenAiClient) -> Self {
        Self {
            client,
            prompt: EXTRACTION_PROMPT.to_string(),
        }
    }

    /// Replaces the schema prompt, e.g. with one loaded from a file.
    ///
    /// The replacement must keep the same JSON keys for the parser to
    /// recognize the reply.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Returns a reference to the underlying client.
    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl StructureProvider for OpenAiStructureProvider {
    async fn structure(&self, file_name: &str, text: &str) -> tarify_core::Result<InvoiceRecord> {
        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            file_name,
            text_len = text.len(),
            "Structuring extracted text"
        );

        let content = self
            .client
            .chat_completion(&self.prompt, text)
            .await
            .map_err(into_core_error)?;

        let record = parse_record(&content).map_err(into_core_error)?;

        tracing::debug!(
            target: TRACING_TARGET_PROVIDER,
            file_name,
            charges = record.charges.len(),
            history = record.history.len(),
            "Structured record parsed"
        );

        Ok(record)
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
        Error::Http(e) if e.is_timeout() => tarify_core::Error::timeout(),
        Error::Http(_) => tarify_core::Error::network(),
        Error::RateLimited => tarify_core::Error::rate_limited(),
        Error::ApiError { status, .. } if *status == 429 => tarify_core::Error::rate_limited(),
        Error::ApiError { status, .. } if *status >= 500 => {
            tarify_core::Error::service_unavailable()
        }
        Error::ApiError { .. } => tarify_core::Error::external(),
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
    use super::*;
    use tarify_core::ErrorKind;

    #[test]
    fn test_error_mapping() {
        let malformed = into_core_error(Error::malformed_response("not json"));
        assert_eq!(malformed.kind, ErrorKind::MalformedResponse);
        assert!(!malformed.is_retryable());

        let throttled = into_core_error(Error::RateLimited);
        assert_eq!(throttled.kind, ErrorKind::RateLimited);
        assert!(throttled.is_retryable());
    }
}
