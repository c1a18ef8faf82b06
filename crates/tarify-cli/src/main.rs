#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tarify_batch::{BatchRunner, InvoicePipeline};
use tarify_core::BatchResult;
use tarify_openai::{OpenAiClient, OpenAiConfig, OpenAiCredentials, OpenAiStructureProvider};
use tarify_whisperer::{
    WhispererClient, WhispererConfig, WhispererCredentials, WhispererTextProvider,
};
use tarify_xlsx::WorkbookBuilder;

use crate::config::{Cli, ServiceArgs};

mod config;
mod inputs;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "tarify_cli::startup";
pub const TRACING_TARGET_RUN: &str = "tarify_cli::run";
pub const TRACING_TARGET_INPUTS: &str = "tarify_cli::inputs";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_RUN,
            error = %error,
            "run terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    // Load .env before clap reads env-backed arguments.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_tracing();
    log_startup_info();

    let pipeline = build_pipeline(&cli.services)?;

    if cli.check {
        return check_services(&pipeline).await;
    }

    let files = inputs::collect_source_files(&cli.inputs)?;
    anyhow::ensure!(!files.is_empty(), "no PDF files found in the given inputs");

    let runner = BatchRunner::new(pipeline).with_config(cli.batch.to_config());

    let batch = runner.run(files).await.context("batch run failed")?;
    log_batch_summary(&batch);

    let buffer = WorkbookBuilder::new()
        .build_to_buffer(&batch)
        .context("failed to build workbook")?;
    std::fs::write(&cli.out, &buffer)
        .with_context(|| format!("failed to write {}", cli.out.display()))?;

    tracing::info!(
        target: TRACING_TARGET_RUN,
        path = %cli.out.display(),
        processed = batch.processed(),
        failed = batch.failed(),
        "Workbook written"
    );

    Ok(())
}

/// Runs the remote-service health checks and reports their status.
async fn check_services(pipeline: &InvoicePipeline) -> anyhow::Result<()> {
    let (text, structure) = pipeline.health_check().await;

    tracing::info!(
        target: TRACING_TARGET_RUN,
        status = ?text.status,
        message = text.message.as_deref().unwrap_or(""),
        "text-extraction service"
    );
    tracing::info!(
        target: TRACING_TARGET_RUN,
        status = ?structure.status,
        message = structure.message.as_deref().unwrap_or(""),
        "inference service"
    );

    anyhow::ensure!(
        text.is_operational() && structure.is_operational(),
        "one or more services are not operational"
    );
    Ok(())
}

/// Builds the two remote-service clients and composes the pipeline.
///
/// Missing credentials surface here, before any file is dispatched.
fn build_pipeline(services: &ServiceArgs) -> anyhow::Result<InvoicePipeline> {
    let mut whisperer_builder = WhispererConfig::builder()
        .with_wait_timeout(Duration::from_secs(services.whisperer_timeout_secs));
    if let Some(url) = &services.whisperer_url {
        whisperer_builder = whisperer_builder.with_base_url(url)?;
    }
    let whisperer_config = whisperer_builder.build()?;
    let whisperer_credentials =
        WhispererCredentials::api_key(services.whisperer_api_key.clone().unwrap_or_default());
    let whisperer = WhispererClient::new(whisperer_config, whisperer_credentials)
        .context("text-extraction service is not configured")?;

    let mut openai_builder = OpenAiConfig::builder().with_model(services.model.clone());
    if let Some(url) = &services.openai_url {
        openai_builder = openai_builder.with_base_url(url)?;
    }
    let openai_config = openai_builder.build()?;
    let openai_credentials =
        OpenAiCredentials::api_key(services.openai_api_key.clone().unwrap_or_default());
    let openai = OpenAiClient::new(openai_config, openai_credentials)
        .context("inference service is not configured")?;

    let mut structure = OpenAiStructureProvider::new(openai);
    if let Some(path) = &services.prompt_file {
        let prompt = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt file {}", path.display()))?;
        structure = structure.with_prompt(prompt);
    }

    Ok(InvoicePipeline::new(
        WhispererTextProvider::new(whisperer),
        structure,
    ))
}

/// Logs the per-file outcomes after a run.
fn log_batch_summary(batch: &BatchResult) {
    for result in batch {
        match result.failure() {
            None => {
                tracing::info!(
                    target: TRACING_TARGET_RUN,
                    file = %result.file_name,
                    "processed"
                );
            }
            Some((stage, reason, retryable)) => {
                tracing::warn!(
                    target: TRACING_TARGET_RUN,
                    file = %result.file_name,
                    stage = %stage,
                    reason,
                    retryable,
                    "failed"
                );
            }
        }
    }
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting tarify"
    );

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        pid = process::id(),
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "build information"
    );
}
