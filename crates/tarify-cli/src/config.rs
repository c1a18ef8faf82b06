//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser};
use tarify_batch::{BatchConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_CONCURRENT};

/// Default per-file timeout in seconds.
const DEFAULT_FILE_TIMEOUT_SECS: u64 = 60;

/// Convert PDF utility invoices into an Excel workbook.
#[derive(Debug, Parser)]
#[command(name = "tarify", version, about)]
pub struct Cli {
    /// PDF files or directories containing PDFs.
    #[arg(required_unless_present = "check")]
    pub inputs: Vec<PathBuf>,

    /// Output workbook path.
    #[arg(long, short = 'o', default_value = "invoices.xlsx")]
    pub out: PathBuf,

    /// Check both remote services and exit without processing anything.
    #[arg(long)]
    pub check: bool,

    #[command(flatten)]
    pub batch: BatchArgs,

    #[command(flatten)]
    pub services: ServiceArgs,
}

/// Batch orchestration knobs.
#[derive(Debug, Args)]
pub struct BatchArgs {
    /// Maximum number of files processed concurrently.
    #[arg(
        long = "max-concurrent",
        env = "TARIFY_MAX_CONCURRENT",
        default_value_t = DEFAULT_MAX_CONCURRENT
    )]
    pub max_concurrent: usize,

    /// Number of files per dispatch wave.
    #[arg(
        long = "chunk-size",
        env = "TARIFY_CHUNK_SIZE",
        default_value_t = DEFAULT_CHUNK_SIZE
    )]
    pub chunk_size: usize,

    /// Per-file deadline in seconds, covering both remote calls.
    #[arg(
        long = "file-timeout-secs",
        env = "TARIFY_FILE_TIMEOUT_SECS",
        default_value_t = DEFAULT_FILE_TIMEOUT_SECS
    )]
    pub file_timeout_secs: u64,
}

impl BatchArgs {
    /// Builds the batch configuration from the parsed arguments.
    pub fn to_config(&self) -> BatchConfig {
        BatchConfig::default()
            .with_max_concurrent(self.max_concurrent)
            .with_chunk_size(self.chunk_size)
            .with_file_timeout(Duration::from_secs(self.file_timeout_secs))
    }
}

/// Remote service endpoints and credentials.
#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// API key for the text-extraction service.
    #[arg(long = "whisperer-api-key", env = "LLMWHISPERER_API_KEY", hide_env_values = true)]
    pub whisperer_api_key: Option<String>,

    /// Base URL override for the text-extraction service.
    #[arg(long = "whisperer-url", env = "LLMWHISPERER_BASE_URL")]
    pub whisperer_url: Option<String>,

    /// Wait deadline in seconds for one text-extraction job.
    #[arg(
        long = "whisperer-timeout-secs",
        env = "LLMWHISPERER_WAIT_TIMEOUT_SECS",
        default_value_t = 120
    )]
    pub whisperer_timeout_secs: u64,

    /// API key for the inference service.
    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL override for the inference service.
    #[arg(long = "openai-url", env = "OPENAI_BASE_URL")]
    pub openai_url: Option<String>,

    /// Model used for structured extraction.
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// File with a replacement extraction prompt.
    #[arg(long = "prompt-file", env = "TARIFY_PROMPT_FILE")]
    pub prompt_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_batch_defaults() {
        let cli = Cli::try_parse_from(["tarify", "a.pdf"]).expect("valid args");

        assert_eq!(cli.out, PathBuf::from("invoices.xlsx"));
        let config = cli.batch.to_config();
        assert_eq!(config.max_concurrent, 3);
        assert_eq!(config.chunk_size, 5);
        assert_eq!(config.file_timeout, Duration::from_secs(60));
        assert_eq!(cli.services.model, "gpt-4o-mini");
    }

    #[test]
    fn knobs_are_configurable() {
        let cli = Cli::try_parse_from([
            "tarify",
            "a.pdf",
            "b.pdf",
            "--out",
            "result.xlsx",
            "--max-concurrent",
            "5",
            "--chunk-size",
            "10",
            "--file-timeout-secs",
            "90",
            "--model",
            "gpt-4o",
        ])
        .expect("valid args");

        assert_eq!(cli.inputs.len(), 2);
        assert_eq!(cli.out, PathBuf::from("result.xlsx"));
        let config = cli.batch.to_config();
        assert_eq!(config.max_concurrent, 5);
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.file_timeout, Duration::from_secs(90));
        assert_eq!(cli.services.model, "gpt-4o");
    }

    #[test]
    fn inputs_are_required_unless_checking() {
        assert!(Cli::try_parse_from(["tarify"]).is_err());

        let cli = Cli::try_parse_from(["tarify", "--check"]).expect("valid args");
        assert!(cli.check);
        assert!(cli.inputs.is_empty());
    }
}
