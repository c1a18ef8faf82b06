//! The per-file processing pipeline.
//!
//! Sequential composition of the two remote stages: text extraction, then
//! structured extraction. The pipeline never returns an error; every
//! provider failure is captured into the file's [`FileResult`] together
//! with the stage it occurred in and its retryability.

use std::time::Duration;

use tarify_core::provider::{BoxedStructureProvider, BoxedTextProvider};
use tarify_core::{
    Error, FailureStage, FileResult, ServiceHealth, SourceFile, StructureProvider, TextProvider,
};

use crate::TRACING_TARGET_PIPELINE;

/// Two-stage pipeline applied to one file.
///
/// Each invocation is independent and has no side effects beyond the two
/// remote calls, which makes it the unit of work the
/// [`BatchRunner`](crate::BatchRunner) distributes.
#[derive(Clone)]
pub struct InvoicePipeline {
    text: BoxedTextProvider,
    structure: BoxedStructureProvider,
}

impl InvoicePipeline {
    /// Creates a pipeline from concrete providers.
    pub fn new<T, S>(text: T, structure: S) -> Self
    where
        T: TextProvider + 'static,
        S: StructureProvider + 'static,
    {
        Self {
            text: std::sync::Arc::new(text),
            structure: std::sync::Arc::new(structure),
        }
    }

    /// Creates a pipeline from already-shared providers.
    pub fn from_shared(text: BoxedTextProvider, structure: BoxedStructureProvider) -> Self {
        Self { text, structure }
    }

    /// Processes one file without a deadline.
    pub async fn process(&self, file: &SourceFile) -> FileResult {
        self.process_within(file, None).await
    }

    /// Processes one file, bounding both remote calls by one shared budget.
    ///
    /// The deadline covers the whole pipeline: time spent extracting text
    /// is no longer available to the structuring call. A file that runs
    /// out of budget fails with a retryable timeout attributed to the
    /// stage that was in flight.
    pub async fn process_within(&self, file: &SourceFile, budget: Option<Duration>) -> FileResult {
        let deadline = budget.map(|budget| tokio::time::Instant::now() + budget);

        let text = match stage_call(deadline, self.text.extract_text(file)).await {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                return fail(file, FailureStage::Extraction, &error);
            }
            Err(timeout) => {
                return fail(file, FailureStage::Extraction, &timeout);
            }
        };

        tracing::debug!(
            target: TRACING_TARGET_PIPELINE,
            file_name = %file.file_name,
            text_len = text.len(),
            "Text extracted, structuring"
        );

        match stage_call(deadline, self.structure.structure(&file.file_name, &text)).await {
            Ok(Ok(record)) => {
                tracing::info!(
                    target: TRACING_TARGET_PIPELINE,
                    file_name = %file.file_name,
                    charges = record.charges.len(),
                    "File processed"
                );
                FileResult::processed(&file.file_name, record)
            }
            Ok(Err(error)) => fail(file, FailureStage::Structuring, &error),
            Err(timeout) => fail(file, FailureStage::Structuring, &timeout),
        }
    }

    /// Health of both remote services, for pre-dispatch validation.
    pub async fn health_check(&self) -> (ServiceHealth, ServiceHealth) {
        let text = match self.text.health_check().await {
            Ok(health) => health,
            Err(error) => ServiceHealth::unhealthy(error.to_string()),
        };
        let structure = match self.structure.health_check().await {
            Ok(health) => health,
            Err(error) => ServiceHealth::unhealthy(error.to_string()),
        };
        (text, structure)
    }
}

impl std::fmt::Debug for InvoicePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoicePipeline").finish_non_exhaustive()
    }
}

/// Runs one stage future, bounded by the shared deadline when present.
///
/// The outer `Err` carries the timeout error; the inner result is the
/// stage's own outcome.
async fn stage_call<T>(
    deadline: Option<tokio::time::Instant>,
    call: impl Future<Output = tarify_core::Result<T>>,
) -> Result<tarify_core::Result<T>, Error> {
    match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, call)
            .await
            .map_err(|_| Error::timeout().with_message("file deadline exceeded")),
        None => Ok(call.await),
    }
}

/// Builds the failed result and logs it.
fn fail(file: &SourceFile, stage: FailureStage, error: &Error) -> FileResult {
    tracing::warn!(
        target: TRACING_TARGET_PIPELINE,
        file_name = %file.file_name,
        stage = %stage,
        error = %error,
        retryable = error.is_retryable(),
        "File failed"
    );
    FileResult::failed(&file.file_name, stage, error)
}
