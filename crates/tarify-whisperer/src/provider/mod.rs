//! Provider implementations for tarify-core traits.
//!
//! This module adapts the text-extraction client to the
//! [`TextProvider`](tarify_core::TextProvider) seam consumed by the batch
//! pipeline.

mod text;

pub use text::WhispererTextProvider;
