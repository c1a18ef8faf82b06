//! Remote service abstractions.
//!
//! This module defines the two provider traits at the pipeline's seams:
//! text extraction (PDF bytes to raw text) and structured extraction
//! (raw text to an [`InvoiceRecord`]). Concrete clients live in their own
//! crates; test doubles implement the same traits.

use std::sync::Arc;

use crate::error::Result;
use crate::health::ServiceHealth;
use crate::record::InvoiceRecord;
use crate::result::SourceFile;

/// Type alias for a shared, dynamically dispatched text provider.
pub type BoxedTextProvider = Arc<dyn TextProvider>;

/// Type alias for a shared, dynamically dispatched structure provider.
pub type BoxedStructureProvider = Arc<dyn StructureProvider>;

/// Core trait for the text-extraction service.
///
/// Implementations submit the document to a remote OCR/text-extraction
/// service and block (asynchronously) until the extracted text is
/// available or the configured wait deadline expires. The returned error
/// distinguishes retryable conditions from fatal ones via
/// [`Error::is_retryable`](crate::Error::is_retryable).
#[async_trait::async_trait]
pub trait TextProvider: Send + Sync {
    /// Extracts layout-preserving text from the given document.
    async fn extract_text(&self, file: &SourceFile) -> Result<String>;

    /// Verifies that the service is reachable and the credential is valid.
    async fn health_check(&self) -> Result<ServiceHealth>;
}

/// Core trait for the structured-extraction service.
///
/// Implementations send the extracted text together with a fixed field
/// schema to an inference service configured for deterministic output and
/// parse the reply into an [`InvoiceRecord`]. Fields the service omits or
/// returns with an unusable type become absent in the record; only a
/// transport failure, a timeout, or an unparseable response envelope is
/// an error.
#[async_trait::async_trait]
pub trait StructureProvider: Send + Sync {
    /// Converts extracted invoice text into a structured record.
    async fn structure(&self, file_name: &str, text: &str) -> Result<InvoiceRecord>;

    /// Verifies that the service is reachable and the credential is valid.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
