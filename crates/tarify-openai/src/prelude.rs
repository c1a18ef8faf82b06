//! Prelude for the tarify-openai crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use crate::client::{OpenAiClient, OpenAiConfig, OpenAiCredentials};
pub use crate::error::{Error, Result};
pub use crate::provider::OpenAiStructureProvider;
