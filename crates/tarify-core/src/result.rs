//! Per-file and per-batch result types.
//!
//! A batch run yields exactly one [`FileResult`] per submitted
//! [`SourceFile`], in submission order, regardless of how many individual
//! files failed. Failures carry the pipeline stage they occurred in and
//! whether a retry might succeed.

use bytes::Bytes;
use strum::{AsRefStr, Display, IntoStaticStr};

use crate::error::Error;
use crate::record::InvoiceRecord;

/// One input document submitted to a batch run.
///
/// The content is reference-counted; cloning a `SourceFile` never copies
/// the PDF bytes. No component retains the bytes after the file has a
/// [`FileResult`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name, used to identify the file in results and logs.
    pub file_name: String,
    /// Raw PDF content.
    pub content: Bytes,
}

impl SourceFile {
    /// Creates a new source file from a name and its raw content.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Size of the document in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the document has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Pipeline stage in which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum FailureStage {
    /// The text-extraction call failed.
    Extraction,
    /// The structured-extraction call failed.
    Structuring,
}

/// Outcome of processing one file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Both stages succeeded and produced a structured record.
    Processed(InvoiceRecord),
    /// One of the stages failed; the file has no record.
    Failed {
        /// Stage that produced the failure.
        stage: FailureStage,
        /// Human-readable failure reason.
        reason: String,
        /// Whether resubmitting the file may succeed.
        retryable: bool,
    },
}

/// Result of processing one file, tagged with its originating file name.
#[derive(Debug, Clone)]
pub struct FileResult {
    /// Name of the source file this result belongs to.
    pub file_name: String,
    /// Processing outcome.
    pub outcome: FileOutcome,
}

impl FileResult {
    /// Creates a successful result carrying the extracted record.
    pub fn processed(file_name: impl Into<String>, record: InvoiceRecord) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: FileOutcome::Processed(record),
        }
    }

    /// Creates a failed result from a provider error.
    ///
    /// The retryability classification is taken from the error itself.
    pub fn failed(file_name: impl Into<String>, stage: FailureStage, error: &Error) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: FileOutcome::Failed {
                stage,
                reason: error.to_string(),
                retryable: error.is_retryable(),
            },
        }
    }

    /// Creates a failed result with an explicit reason.
    pub fn failed_with_reason(
        file_name: impl Into<String>,
        stage: FailureStage,
        reason: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            outcome: FileOutcome::Failed {
                stage,
                reason: reason.into(),
                retryable,
            },
        }
    }

    /// Whether the file was processed successfully.
    pub fn is_processed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Processed(_))
    }

    /// The extracted record, if the file was processed.
    pub fn record(&self) -> Option<&InvoiceRecord> {
        match &self.outcome {
            FileOutcome::Processed(record) => Some(record),
            FileOutcome::Failed { .. } => None,
        }
    }

    /// The failure details, if the file failed.
    pub fn failure(&self) -> Option<(FailureStage, &str, bool)> {
        match &self.outcome {
            FileOutcome::Processed(_) => None,
            FileOutcome::Failed {
                stage,
                reason,
                retryable,
            } => Some((*stage, reason.as_str(), *retryable)),
        }
    }
}

/// Ordered collection of per-file results for one batch run.
///
/// The order matches submission order, not completion order, and there is
/// exactly one entry per submitted file.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    results: Vec<FileResult>,
}

impl BatchResult {
    /// Wraps an ordered list of per-file results.
    pub fn new(results: Vec<FileResult>) -> Self {
        Self { results }
    }

    /// Number of files in the batch.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the batch contained no files.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of successfully processed files.
    pub fn processed(&self) -> usize {
        self.results.iter().filter(|r| r.is_processed()).count()
    }

    /// Number of failed files.
    pub fn failed(&self) -> usize {
        self.results.len() - self.processed()
    }

    /// Iterates the results in submission order.
    pub fn iter(&self) -> impl Iterator<Item = &FileResult> {
        self.results.iter()
    }

    /// The result at the given submission index.
    pub fn get(&self, index: usize) -> Option<&FileResult> {
        self.results.get(index)
    }

    /// Consumes the batch, returning the ordered results.
    pub fn into_results(self) -> Vec<FileResult> {
        self.results
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a FileResult;
    type IntoIter = std::slice::Iter<'a, FileResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn failed_result_carries_retryability() {
        let timeout = FileResult::failed("a.pdf", FailureStage::Extraction, &Error::timeout());
        let unreadable = FileResult::failed(
            "b.pdf",
            FailureStage::Extraction,
            &Error::unsupported_document(),
        );

        assert_eq!(timeout.failure().unwrap().2, true);
        assert_eq!(unreadable.failure().unwrap().2, false);
    }

    #[test]
    fn batch_counts() {
        let batch = BatchResult::new(vec![
            FileResult::processed("a.pdf", InvoiceRecord::default()),
            FileResult::failed("b.pdf", FailureStage::Structuring, &Error::timeout()),
            FileResult::processed("c.pdf", InvoiceRecord::default()),
        ]);

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.processed(), 2);
        assert_eq!(batch.failed(), 1);
    }

    #[test]
    fn failure_stage_display() {
        assert_eq!(FailureStage::Extraction.to_string(), "extraction");
        assert_eq!(FailureStage::Structuring.to_string(), "structuring");
    }

    #[test]
    fn source_file_clone_shares_bytes() {
        let file = SourceFile::new("a.pdf", vec![1u8, 2, 3]);
        let clone = file.clone();
        assert_eq!(file.len(), clone.len());
        assert_eq!(file.content.as_ptr(), clone.content.as_ptr());
    }
}
