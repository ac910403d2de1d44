//! Command-line argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// Official-document reply drafter: LLM extraction, deterministic
/// validation, reply rendering.
#[derive(Debug, Parser)]
#[command(name = "paperclerk", version, about)]
pub struct Cli {
    /// Input documents, laid out as <DATA_DIR>/<class>/<name>.txt
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Output directory for rendered replies and debug dumps
    #[arg(long, default_value = "outputs")]
    pub out_dir: PathBuf,

    /// Prompt templates directory (core_extract.prompt + addons/)
    #[arg(long, default_value = "prompts")]
    pub prompts_dir: PathBuf,

    /// Model tag to run (overrides config)
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama endpoint (overrides config)
    #[arg(long, env = "OLLAMA_HOST")]
    pub endpoint: Option<String>,

    /// Path to a TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}
