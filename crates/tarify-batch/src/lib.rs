#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for per-file pipeline operations.
pub const TRACING_TARGET_PIPELINE: &str = "tarify_batch::pipeline";

/// Tracing target for batch orchestration.
pub const TRACING_TARGET_RUNNER: &str = "tarify_batch::runner";

mod config;
mod error;
mod pipeline;
mod runner;

pub use config::{
    BatchConfig, DEFAULT_CHUNK_SIZE, DEFAULT_FILE_TIMEOUT, DEFAULT_MAX_CONCURRENT,
};
pub use error::{BatchError, Result};
pub use pipeline::InvoicePipeline;
pub use runner::BatchRunner;
