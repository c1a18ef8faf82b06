#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for workbook construction.
pub const TRACING_TARGET_BUILDER: &str = "tarify_xlsx::builder";

mod builder;
mod error;

pub use builder::WorkbookBuilder;
pub use error::{Error, Result};

// Re-export the workbook type callers receive from the builder.
pub use rust_xlsxwriter::Workbook;
