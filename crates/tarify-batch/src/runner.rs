//! Batch orchestration.
//!
//! Fans a set of files out over the per-file pipeline with bounded
//! concurrency and chunked dispatch. Invariants upheld here:
//!
//! - exactly one [`FileResult`] per input file, in submission order;
//! - a failure, timeout, or panic in one file never aborts its siblings;
//! - chunk K+1 is not dispatched until every file of chunk K resolved.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use uuid::Uuid;

use tarify_core::{BatchResult, FailureStage, FileResult, SourceFile};

use crate::TRACING_TARGET_RUNNER;
use crate::config::BatchConfig;
use crate::error::Result;
use crate::pipeline::InvoicePipeline;

/// Runs batches of files through the pipeline.
///
/// # Examples
///
/// ```rust,ignore
/// use tarify_batch::{BatchConfig, BatchRunner, InvoicePipeline};
///
/// let pipeline = InvoicePipeline::new(text_provider, structure_provider);
/// let runner = BatchRunner::new(pipeline)
///     .with_config(BatchConfig::default().with_max_concurrent(3));
/// let batch = runner.run(files).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pipeline: Arc<InvoicePipeline>,
    config: BatchConfig,
}

impl BatchRunner {
    /// Creates a runner with the default configuration.
    pub fn new(pipeline: InvoicePipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            config: BatchConfig::default(),
        }
    }

    /// Replaces the batch configuration.
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Processes all files, returning one result per input in submission
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConfig`](crate::BatchError) before any
    /// work is dispatched if the configuration is unusable. Per-file
    /// failures never surface here; they are entries in the returned
    /// [`BatchResult`].
    pub async fn run(&self, files: Vec<SourceFile>) -> Result<BatchResult> {
        self.config.validate()?;

        let batch_id = Uuid::new_v4();
        let total = files.len();

        tracing::info!(
            target: TRACING_TARGET_RUNNER,
            batch_id = %batch_id,
            files = total,
            max_concurrent = self.config.max_concurrent,
            chunk_size = self.config.chunk_size,
            file_timeout = ?self.config.file_timeout,
            "Starting batch run"
        );

        // One slot per input, indexed by submission position, so results
        // land in order no matter when their tasks complete.
        let mut slots: Vec<Option<FileResult>> = (0..total).map(|_| None).collect();
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));

        let mut files = files;
        let mut next_index = 0usize;
        let mut chunk_number = 0usize;

        while !files.is_empty() {
            let take = files.len().min(self.config.chunk_size);
            let chunk: Vec<SourceFile> = files.drain(..take).collect();
            chunk_number += 1;

            tracing::debug!(
                target: TRACING_TARGET_RUNNER,
                batch_id = %batch_id,
                chunk = chunk_number,
                size = chunk.len(),
                "Dispatching chunk"
            );

            let handles: Vec<(usize, String, JoinHandle<(usize, FileResult)>)> = chunk
                .into_iter()
                .map(|file| {
                    let index = next_index;
                    next_index += 1;
                    let file_name = file.file_name.clone();
                    let handle = self.spawn_file_task(index, file, Arc::clone(&semaphore));
                    (index, file_name, handle)
                })
                .collect();

            // Chunk barrier: every file of this chunk resolves before the
            // next chunk is dispatched.
            for (index, file_name, handle) in handles {
                match handle.await {
                    Ok((slot, result)) => slots[slot] = Some(result),
                    Err(join_error) => {
                        slots[index] = Some(FileResult::failed_with_reason(
                            &file_name,
                            FailureStage::Extraction,
                            format!("worker terminated unexpectedly: {}", join_error),
                            false,
                        ));
                    }
                }
            }
        }

        let results: Vec<FileResult> = slots
            .into_iter()
            .map(|slot| slot.expect("chunk barrier guarantees every slot is filled"))
            .collect();
        let batch = BatchResult::new(results);

        tracing::info!(
            target: TRACING_TARGET_RUNNER,
            batch_id = %batch_id,
            processed = batch.processed(),
            failed = batch.failed(),
            "Batch run completed"
        );

        Ok(batch)
    }

    /// Spawns the task for one file.
    ///
    /// The permit is held for the task's whole lifetime, so at most
    /// `max_concurrent` pipelines are in flight. The task owns its file;
    /// the PDF bytes are dropped as soon as the result exists.
    fn spawn_file_task(
        &self,
        index: usize,
        file: SourceFile,
        semaphore: Arc<Semaphore>,
    ) -> JoinHandle<(usize, FileResult)> {
        let pipeline = Arc::clone(&self.pipeline);
        let file_timeout = self.config.file_timeout;

        tokio::spawn(async move {
            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        index,
                        FileResult::failed_with_reason(
                            &file.file_name,
                            FailureStage::Extraction,
                            "worker pool closed before dispatch",
                            true,
                        ),
                    );
                }
            };
            let _permit = permit;

            let result = pipeline.process_within(&file, Some(file_timeout)).await;
            (index, result)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use tarify_test::{
        CallGauge, MockFailure, MockStructureConfig, MockStructureProvider, MockTextConfig,
        MockTextProvider,
    };

    use super::*;
    use crate::error::BatchError;

    fn files(names: &[&str]) -> Vec<SourceFile> {
        names
            .iter()
            .map(|name| SourceFile::new(*name, vec![0u8; 16]))
            .collect()
    }

    fn pipeline_with(text: MockTextProvider, structure: MockStructureProvider) -> InvoicePipeline {
        InvoicePipeline::new(text, structure)
    }

    #[tokio::test]
    async fn one_result_per_input_in_submission_order() {
        // Staggered latencies so completion order differs from submission
        // order.
        let delays = HashMap::from([
            ("a.pdf".to_string(), Duration::from_millis(40)),
            ("b.pdf".to_string(), Duration::from_millis(5)),
            ("c.pdf".to_string(), Duration::from_millis(20)),
        ]);
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            delays,
            ..Default::default()
        });
        let structure = MockStructureProvider::default();

        let runner = BatchRunner::new(pipeline_with(text, structure));
        let inputs = files(&["a.pdf", "b.pdf", "c.pdf"]);
        let batch = runner.run(inputs).await.expect("valid config");

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.get(0).unwrap().file_name, "a.pdf");
        assert_eq!(batch.get(1).unwrap().file_name, "b.pdf");
        assert_eq!(batch.get(2).unwrap().file_name, "c.pdf");
        assert_eq!(batch.processed(), 3);
    }

    #[tokio::test]
    async fn timeout_is_isolated_to_one_file() {
        let delays = HashMap::from([("slow.pdf".to_string(), Duration::from_millis(200))]);
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            delays,
            ..Default::default()
        });
        let structure = MockStructureProvider::default();

        let runner = BatchRunner::new(pipeline_with(text, structure)).with_config(
            BatchConfig::default().with_file_timeout(Duration::from_millis(50)),
        );
        let inputs = files(&["1.pdf", "2.pdf", "slow.pdf", "3.pdf", "4.pdf"]);
        let batch = runner.run(inputs).await.expect("valid config");

        assert_eq!(batch.len(), 5);
        assert_eq!(batch.processed(), 4);
        assert_eq!(batch.failed(), 1);

        let (stage, reason, retryable) = batch.get(2).unwrap().failure().expect("slow file failed");
        assert_eq!(stage, FailureStage::Extraction);
        assert!(reason.contains("timeout"), "reason was: {reason}");
        assert!(retryable);
    }

    #[tokio::test]
    async fn concurrency_never_exceeds_limit() {
        let gauge = Arc::new(CallGauge::new());
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            latency: Duration::from_millis(20),
            ..Default::default()
        })
        .with_gauge(Arc::clone(&gauge));
        let structure = MockStructureProvider::new(MockStructureConfig {
            latency: Duration::from_millis(20),
            ..Default::default()
        })
        .with_gauge(Arc::clone(&gauge));

        let runner = BatchRunner::new(pipeline_with(text, structure)).with_config(
            BatchConfig::default()
                .with_max_concurrent(3)
                .with_chunk_size(8),
        );
        let inputs = files(&["1", "2", "3", "4", "5", "6", "7", "8"]);
        let batch = runner.run(inputs).await.expect("valid config");

        assert_eq!(batch.processed(), 8);
        assert!(
            gauge.max_in_flight() <= 3,
            "observed {} concurrent calls",
            gauge.max_in_flight()
        );
        // Two provider calls per file.
        assert_eq!(gauge.total(), 16);
    }

    #[tokio::test]
    async fn chunk_resolves_before_next_chunk_dispatches() {
        let gauge = Arc::new(CallGauge::new());
        let delays = HashMap::from([("1.pdf".to_string(), Duration::from_millis(40))]);
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            delays,
            ..Default::default()
        })
        .with_gauge(Arc::clone(&gauge));
        let structure = MockStructureProvider::default().with_gauge(Arc::clone(&gauge));

        let runner = BatchRunner::new(pipeline_with(text, structure))
            .with_config(BatchConfig::default().with_chunk_size(2));
        let inputs = files(&["1.pdf", "2.pdf", "3.pdf", "4.pdf", "5.pdf"]);
        let batch = runner.run(inputs).await.expect("valid config");

        assert_eq!(batch.len(), 5);

        // Each file logs two calls (text, then structure). Both calls of
        // files 1-2 must precede any call of files 3-5.
        let calls = gauge.calls();
        let first_of_second_chunk = calls
            .iter()
            .position(|name| name == "3.pdf" || name == "4.pdf" || name == "5.pdf")
            .expect("second chunk dispatched");
        let chunk_one_calls = calls[..first_of_second_chunk]
            .iter()
            .filter(|name| *name == "1.pdf" || *name == "2.pdf")
            .count();
        assert_eq!(chunk_one_calls, 4, "call order was: {calls:?}");
    }

    #[tokio::test]
    async fn provider_failures_map_to_stages() {
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            failures: HashMap::from([("bad.pdf".to_string(), MockFailure::Unsupported)]),
            ..Default::default()
        });
        let structure = MockStructureProvider::new(MockStructureConfig {
            failures: HashMap::from([("garbled.pdf".to_string(), MockFailure::Malformed)]),
            ..Default::default()
        });

        let runner = BatchRunner::new(pipeline_with(text, structure));
        let inputs = files(&["bad.pdf", "garbled.pdf", "fine.pdf"]);
        let batch = runner.run(inputs).await.expect("valid config");

        let (stage, _, retryable) = batch.get(0).unwrap().failure().expect("bad.pdf failed");
        assert_eq!(stage, FailureStage::Extraction);
        assert!(!retryable);

        let (stage, _, retryable) = batch.get(1).unwrap().failure().expect("garbled.pdf failed");
        assert_eq!(stage, FailureStage::Structuring);
        assert!(!retryable);

        assert!(batch.get(2).unwrap().is_processed());
    }

    #[tokio::test]
    async fn panic_in_one_file_does_not_abort_siblings() {
        let text = MockTextProvider::new(MockTextConfig {
            text: "TEXT".into(),
            failures: HashMap::from([("boom.pdf".to_string(), MockFailure::Panic)]),
            ..Default::default()
        });
        let structure = MockStructureProvider::default();

        let runner = BatchRunner::new(pipeline_with(text, structure));
        let inputs = files(&["ok1.pdf", "boom.pdf", "ok2.pdf"]);
        let batch = runner.run(inputs).await.expect("valid config");

        assert_eq!(batch.len(), 3);
        assert!(batch.get(0).unwrap().is_processed());
        assert!(batch.get(2).unwrap().is_processed());

        let (_, reason, retryable) = batch.get(1).unwrap().failure().expect("boom.pdf failed");
        assert!(reason.contains("worker terminated"), "reason was: {reason}");
        assert!(!retryable);
    }

    #[tokio::test]
    async fn invalid_config_aborts_before_dispatch() {
        let gauge = Arc::new(CallGauge::new());
        let text = MockTextProvider::with_text("TEXT").with_gauge(Arc::clone(&gauge));
        let structure = MockStructureProvider::default().with_gauge(Arc::clone(&gauge));

        let runner = BatchRunner::new(pipeline_with(text, structure))
            .with_config(BatchConfig::default().with_max_concurrent(0));
        let result = runner.run(files(&["a.pdf"])).await;

        assert!(matches!(result, Err(BatchError::InvalidConfig { .. })));
        assert_eq!(gauge.total(), 0, "no provider call before validation");
    }

    #[tokio::test]
    async fn empty_batch_yields_empty_result() {
        let runner = BatchRunner::new(pipeline_with(
            MockTextProvider::with_text("TEXT"),
            MockStructureProvider::default(),
        ));
        let batch = runner.run(Vec::new()).await.expect("valid config");
        assert!(batch.is_empty());
    }
}
