use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use tokensift_core::DetectorKind;
use tokensift_core::engine::EngineConfig;

#[derive(Debug, Parser)]
#[command(
    name = "tokensift",
    version,
    about = "Heuristic risk scanner for Solidity token contracts"
)]
pub struct Args {
    /// Path to the contract source, or `-` to read stdin
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Optional git commit hash for tool metadata
    #[arg(long)]
    pub commit: Option<String>,

    /// Run detectors on the current thread
    #[arg(long)]
    pub sequential: bool,

    /// Fail on input that does not look like contract source
    #[arg(long)]
    pub strict: bool,

    /// Run only the named detector (repeatable)
    #[arg(long = "only", value_name = "DETECTOR")]
    pub only: Vec<DetectorKind>,

    /// Log debug events to stderr (overridden by TOKENSIFT_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl Args {
    pub fn reads_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig {
            parallel: !self.sequential,
            strict: self.strict,
            ..EngineConfig::default()
        };
        if !self.only.is_empty() {
            config.detectors = self.only.clone();
        }
        config
    }
}
