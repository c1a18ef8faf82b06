#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

//! # Tarify Core
//!
//! This crate provides the foundational abstractions for the tarify invoice
//! pipeline. It defines the invoice record schema, per-file and per-batch
//! result types, and the provider traits for the two remote services (text
//! extraction and structured extraction) without depending on any concrete
//! implementation.

mod error;
mod health;
mod record;
mod result;

pub mod provider;

// Re-export key types for convenience
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use provider::{StructureProvider, TextProvider};
pub use record::{ChargeLine, ConsumptionEntry, InvoiceRecord};
pub use result::{BatchResult, FailureStage, FileOutcome, FileResult, SourceFile};
