#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for text-extraction client operations.
///
/// Use this target for logging client initialization, job submission,
/// polling, and client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "tarify_whisperer::client";

/// Tracing target for the provider adapter.
pub const TRACING_TARGET_PROVIDER: &str = "tarify_whisperer::provider";

mod client;
pub mod error;
#[doc(hidden)]
pub mod prelude;
pub mod provider;

pub use crate::client::{
    WhisperStatus, WhispererBuilder, WhispererClient, WhispererConfig, WhispererCredentials,
};
pub use crate::error::{Error, Result};
pub use crate::provider::WhispererTextProvider;
