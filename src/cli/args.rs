//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::provider::ProviderId;

/// SegmentScribe - transcribe long recordings in size-bounded segments
#[derive(Parser, Debug)]
#[command(name = "segment-scribe")]
#[command(version)]
#[command(about = "Transcribe long audio/video files by splitting them into provider-sized segments")]
#[command(long_about = None)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG overrides)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe an audio or video file
    Transcribe(TranscribeArgs),
    /// Retry the failed segments of a previous run
    Retry {
        /// Session file printed by a partially successful run
        session: PathBuf,

        /// Only retry these segments (1-based, comma separated)
        #[arg(long, value_name = "N,N", value_delimiter = ',')]
        only: Option<Vec<usize>>,

        /// Write the transcript to a file instead of stdout
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Delete the retained segment files and the session
    Discard {
        /// Session file to abandon
        session: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of the `transcribe` subcommand
#[derive(clap::Args, Debug)]
pub struct TranscribeArgs {
    /// Input media file (any format ffmpeg can read)
    pub input: PathBuf,

    /// Speech-to-text provider
    #[arg(short = 'p', long, value_name = "PROVIDER", env = "SEGMENT_SCRIBE_PROVIDER")]
    pub provider: Option<ProviderArg>,

    /// Segment size limit in MB (capped at the provider's upload limit)
    #[arg(long, value_name = "MB", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_segment_mb: Option<u64>,

    /// Write the transcript to a file instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Parent directory for this run's extracted audio, segments and
    /// session file; each run gets its own `run-<millis>` subdirectory
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Provider argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Groq,
    #[value(alias = "assembly")]
    Assemblyai,
    Gemini,
}

impl From<ProviderArg> for ProviderId {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Groq => ProviderId::Groq,
            ProviderArg::Assemblyai => ProviderId::AssemblyAi,
            ProviderArg::Gemini => ProviderId::Gemini,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "provider",
    "groq_api_key",
    "assemblyai_api_key",
    "gemini_api_key",
    "max_segment_mb",
    "bitrate_kbps",
    "max_attempts",
    "backoff_base",
    "request_timeout",
    "work_dir",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

/// Convert 1-based segment numbers from `--only` to indices.
/// Zero is rejected.
pub fn segment_indices(numbers: &[usize]) -> Result<Vec<usize>, String> {
    numbers
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .ok_or_else(|| "segment numbers start at 1".to_string())
        })
        .collect()
}
