//! Chat-completion client module
//!
//! This module provides the client interface for the OpenAI
//! chat-completions API with deterministic settings.

mod credentials;
mod oai_client;
mod oai_config;

pub use credentials::OpenAiCredentials;
pub use oai_client::OpenAiClient;
pub use oai_config::{OpenAiBuilder, OpenAiBuilderError, OpenAiConfig};
