//! Provider implementations for tarify-core traits.
//!
//! This module adapts the chat-completion client to the
//! [`StructureProvider`](tarify_core::StructureProvider) seam consumed by
//! the batch pipeline.

mod structure;

pub use structure::OpenAiStructureProvider;
