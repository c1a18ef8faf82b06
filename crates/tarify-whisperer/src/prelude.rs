//! Prelude for the tarify-whisperer crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use crate::client::{WhispererClient, WhispererConfig, WhispererCredentials};
pub use crate::error::{Error, Result};
pub use crate::provider::WhispererTextProvider;
