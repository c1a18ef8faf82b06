//! Text-extraction client implementation
//!
//! This module provides the main client for the LLMWhisperer v2 API. The
//! remote service is asynchronous: a document is submitted, the returned
//! job is polled until it completes, and the extracted text is then
//! retrieved. [`WhispererClient::extract_text`] hides that cycle behind a
//! single call bounded by the configured wait timeout.

use bytes::Bytes;
use reqwest::{Client as HttpClient, ClientBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{WhispererConfig, WhispererCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};

/// Lifecycle states reported by the extraction service for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhisperStatus {
    /// Job accepted, not yet picked up.
    Accepted,
    /// Conversion in progress.
    Processing,
    /// Conversion finished, text available.
    Processed,
    /// Text already delivered to a webhook or prior retrieve.
    Delivered,
    /// Conversion failed on the service side.
    Failed,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    whisper_hash: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: WhisperStatus,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    result_text: String,
}

/// Client for the LLMWhisperer v2 text-extraction service.
///
/// The client handles authentication, job submission, status polling, and
/// text retrieval with connection pooling across requests.
///
/// # Examples
///
/// ```rust,ignore
/// use tarify_whisperer::{WhispererClient, WhispererConfig, WhispererCredentials};
///
/// let config = WhispererConfig::builder()
///     .with_wait_timeout(Duration::from_secs(90))
///     .build()?;
/// let credentials = WhispererCredentials::api_key("your-api-key");
/// let client = WhispererClient::new(config, credentials)?;
/// let text = client.extract_text("invoice.pdf", bytes).await?;
/// ```
#[derive(Debug, Clone)]
pub struct WhispererClient {
    http_client: HttpClient,
    config: WhispererConfig,
    credentials: WhispererCredentials,
}

impl WhispererClient {
    /// Create a new text-extraction client with the given configuration
    /// and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or if no
    /// usable credential is configured.
    pub fn new(config: WhispererConfig, credentials: WhispererCredentials) -> Result<Self> {
        if !credentials.is_configured() {
            return Err(Error::auth_error(
                "LLMWHISPERER_API_KEY is not set; define it in the environment or .env",
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            mode = %config.mode,
            "Creating text-extraction client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Create a client with default configuration.
    pub fn with_defaults(credentials: WhispererCredentials) -> Result<Self> {
        Self::new(WhispererConfig::default(), credentials)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &WhispererConfig {
        &self.config
    }

    /// Extract layout-preserving text from a document.
    ///
    /// Submits the document, polls the job at the configured interval, and
    /// retrieves the text once the job reports `processed`. The whole
    /// cycle is bounded by `wait_timeout`; on expiry an
    /// [`Error::Timeout`] (retryable) is returned.
    pub async fn extract_text(&self, file_name: &str, content: Bytes) -> Result<String> {
        let deadline = tokio::time::Instant::now() + self.config.wait_timeout;

        let whisper_hash = self.submit(file_name, content).await?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            file_name,
            whisper_hash = %whisper_hash,
            "Extraction job submitted, polling for completion"
        );

        loop {
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    file_name,
                    whisper_hash = %whisper_hash,
                    timeout = ?self.config.wait_timeout,
                    "Extraction job did not complete before the wait deadline"
                );
                return Err(Error::timeout(self.config.wait_timeout));
            }

            tokio::time::sleep(self.config.poll_interval).await;

            let status = self.status(&whisper_hash).await?;
            match status.status {
                WhisperStatus::Processed | WhisperStatus::Delivered => break,
                WhisperStatus::Accepted | WhisperStatus::Processing => continue,
                WhisperStatus::Failed | WhisperStatus::Unknown => {
                    let reason = status
                        .message
                        .unwrap_or_else(|| "conversion failed on the service side".to_string());
                    return Err(Error::extraction_failed(file_name, reason));
                }
            }
        }

        let text = self.retrieve(&whisper_hash).await?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            file_name,
            whisper_hash = %whisper_hash,
            text_len = text.len(),
            "Text extraction completed"
        );

        Ok(text)
    }

    /// Submit a document for conversion, returning the job identifier.
    async fn submit(&self, file_name: &str, content: Bytes) -> Result<String> {
        let url = self.endpoint("whisper")?;

        let response = self
            .http_client
            .post(url)
            .query(&[
                ("mode", self.config.mode.as_str()),
                ("output_mode", self.config.output_mode.as_str()),
                ("file_name", file_name),
            ])
            .header("Content-Type", "application/octet-stream")
            .headers(self.auth_headers())
            .body(content)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response, Some(file_name)).await);
        }

        let submit: SubmitResponse = response.json().await.map_err(Error::Http)?;
        Ok(submit.whisper_hash)
    }

    /// Query the status of a conversion job.
    async fn status(&self, whisper_hash: &str) -> Result<StatusResponse> {
        let url = self.endpoint("whisper-status")?;

        let response = self
            .http_client
            .get(url)
            .query(&[("whisper_hash", whisper_hash)])
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response, None).await);
        }

        response.json().await.map_err(Error::Http)
    }

    /// Retrieve the extracted text of a completed job.
    async fn retrieve(&self, whisper_hash: &str) -> Result<String> {
        let url = self.endpoint("whisper-retrieve")?;

        let response = self
            .http_client
            .get(url)
            .query(&[("whisper_hash", whisper_hash)])
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response, None).await);
        }

        let body: serde_json::Value = response.json().await.map_err(Error::Http)?;
        let retrieve: RetrieveResponse = serde_json::from_value(body)
            .map_err(|_| Error::malformed_response("response has no result_text field"))?;

        Ok(retrieve.result_text)
    }

    /// Verify that the service is reachable and the credential is valid.
    ///
    /// Uses the usage-info endpoint, which requires a valid key but incurs
    /// no conversion cost.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.endpoint("get-usage-info")?;

        let response = self
            .http_client
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(Error::Http)?;

        if response.status().is_success() {
            tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                status = response.status().as_u16(),
                "Health check successful"
            );
            Ok(())
        } else {
            Err(self.error_from_response(response, None).await)
        }
    }

    /// Build the endpoint URL for an API path segment.
    fn endpoint(&self, segment: &str) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::invalid_config("base URL cannot be a base"))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// Authentication headers for a request.
    fn auth_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let WhispererCredentials::ApiKey(key) = &self.credentials {
            if let Ok(value) = reqwest::header::HeaderValue::from_str(key) {
                headers.insert("unstract-key", value);
            }
        }
        headers
    }

    /// Convert an error response into the matching error variant.
    async fn error_from_response(&self, response: Response, document: Option<&str>) -> Error {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!(
            target: TRACING_TARGET_CLIENT,
            status = status.as_u16(),
            message,
            "Extraction API request failed"
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth_error(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            s if s.is_client_error() => match document {
                Some(document) => Error::unsupported_document(document, message),
                None => Error::api_error(s.as_u16(), message),
            },
            s => Error::api_error(s.as_u16(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_deserialization() {
        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "processing"}"#).expect("valid status");
        assert_eq!(status.status, WhisperStatus::Processing);

        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "processed", "message": "ok"}"#)
                .expect("valid status");
        assert_eq!(status.status, WhisperStatus::Processed);
        assert_eq!(status.message.as_deref(), Some("ok"));

        let status: StatusResponse =
            serde_json::from_str(r#"{"status": "something-new"}"#).expect("valid status");
        assert_eq!(status.status, WhisperStatus::Unknown);
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let config = WhispererConfig::default();
        let client = WhispererClient::new(config, WhispererCredentials::api_key("k"))
            .expect("valid client");

        let url = client.endpoint("whisper").expect("valid endpoint");
        assert_eq!(
            url.as_str(),
            "https://llmwhisperer-api.us-central.unstract.com/api/v2/whisper"
        );
    }

    #[test]
    fn test_missing_credential_rejected() {
        let result = WhispererClient::new(WhispererConfig::default(), WhispererCredentials::none());
        assert!(result.is_err());
    }
}
