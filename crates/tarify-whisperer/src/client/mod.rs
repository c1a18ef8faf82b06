//! Text-extraction client module
//!
//! This module provides the client interface for the LLMWhisperer v2 API.
//! It handles authentication, job submission, status polling, and text
//! retrieval.

mod credentials;
mod wsp_client;
mod wsp_config;

pub use credentials::WhispererCredentials;
pub use wsp_client::{WhisperStatus, WhispererClient};
pub use wsp_config::{WhispererBuilder, WhispererBuilderError, WhispererConfig};
