#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for chat-completion client operations.
pub const TRACING_TARGET_CLIENT: &str = "tarify_openai::client";

/// Tracing target for the provider adapter.
pub const TRACING_TARGET_PROVIDER: &str = "tarify_openai::provider";

/// Tracing target for response parsing.
pub const TRACING_TARGET_PARSE: &str = "tarify_openai::parse";

mod client;
pub mod error;
mod parse;
#[doc(hidden)]
pub mod prelude;
pub mod prompt;
pub mod provider;

pub use crate::client::{OpenAiBuilder, OpenAiClient, OpenAiConfig, OpenAiCredentials};
pub use crate::error::{Error, Result};
pub use crate::parse::parse_record;
pub use crate::provider::OpenAiStructureProvider;
