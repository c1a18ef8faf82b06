//! Chat-completion client implementation
//!
//! This module provides the client for the OpenAI chat-completions API.
//! Every request is pinned to deterministic settings: temperature 0 (for
//! models that accept it) and a JSON-object response format.

use reqwest::{Client as HttpClient, ClientBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{OpenAiConfig, OpenAiCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::error::{Error, Result};

/// Temperature used for every extraction request.
const TEMPERATURE: f64 = 0.0;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for the OpenAI chat-completions API.
///
/// # Examples
///
/// ```rust,ignore
/// use tarify_openai::{OpenAiClient, OpenAiConfig, OpenAiCredentials};
///
/// let config = OpenAiConfig::builder().with_model("gpt-4o-mini").build()?;
/// let credentials = OpenAiCredentials::api_key("sk-...");
/// let client = OpenAiClient::new(config, credentials)?;
/// let reply = client.chat_completion(system_prompt, invoice_text).await?;
/// ```
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    config: OpenAiConfig,
    credentials: OpenAiCredentials,
}

impl OpenAiClient {
    /// Create a new chat-completion client with the given configuration
    /// and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created or if no
    /// usable credential is configured.
    pub fn new(config: OpenAiConfig, credentials: OpenAiCredentials) -> Result<Self> {
        if !credentials.is_configured() {
            return Err(Error::auth_error(
                "OPENAI_API_KEY is not set; define it in the environment or .env",
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            "Creating chat-completion client"
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
    pub fn with_defaults(credentials: OpenAiCredentials) -> Result<Self> {
        Self::new(OpenAiConfig::default(), credentials)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Send one chat completion with a system prompt and a user message.
    ///
    /// Returns the raw content of the first choice. Reasoning models are
    /// sent without the temperature parameter; all others are pinned to 0.
    pub async fn chat_completion(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = self.endpoint("chat/completions")?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: (!self.config.is_reasoning_model()).then_some(TEMPERATURE),
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            model = %self.config.model,
            prompt_len = user_prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(url)
            .headers(self.auth_headers())
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            return Err(self.error_from_response(response).await);
        }

        let reply: ChatResponse = response.json().await.map_err(Error::Http)?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::malformed_response("reply contains no choices"))?;

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            content_len = content.len(),
            "Chat completion received"
        );

        Ok(content)
    }

    /// Verify that the service is reachable and the credential is valid.
    ///
    /// Lists the configured model, which requires a valid key but incurs
    /// no generation cost.
    pub async fn health_check(&self) -> Result<()> {
        let url = self.endpoint(&format!("models/{}", self.config.model))?;

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
            Err(self.error_from_response(response).await)
        }
    }

    /// Build the endpoint URL for an API path.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::invalid_config("base URL cannot be a base"))?;
            segments.pop_if_empty();
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Authentication headers for a request.
    fn auth_headers(&self) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        if let OpenAiCredentials::ApiKey(key) = &self.credentials {
            if let Ok(value) =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", key))
            {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Convert an error response into the matching error variant.
    async fn error_from_response(&self, response: Response) -> Error {
        let status = response.status();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!(
            target: TRACING_TARGET_CLIENT,
            status = status.as_u16(),
            message,
            "Inference API request failed"
        );

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth_error(message),
            StatusCode::TOO_MANY_REQUESTS => Error::RateLimited,
            s => Error::api_error(s.as_u16(), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_nested_path() {
        let client = OpenAiClient::new(
            OpenAiConfig::default(),
            OpenAiCredentials::api_key("sk-test"),
        )
        .expect("valid client");

        let url = client.endpoint("chat/completions").expect("valid endpoint");
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_missing_credential_rejected() {
        let result = OpenAiClient::new(OpenAiConfig::default(), OpenAiCredentials::none());
        assert!(result.is_err());
    }

    #[test]
    fn test_request_serialization_pins_temperature() {
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: vec![ChatMessage {
                role: "system",
                content: "extract",
            }],
            temperature: Some(TEMPERATURE),
            max_tokens: None,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let value = serde_json::to_value(&request).expect("serializable");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["response_format"]["type"], "json_object");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_reasoning_request_omits_temperature() {
        let request = ChatRequest {
            model: "o4-mini",
            messages: vec![],
            temperature: None,
            max_tokens: None,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let value = serde_json::to_value(&request).expect("serializable");
        assert!(value.get("temperature").is_none());
    }
}
