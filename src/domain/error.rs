//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 2s, 5m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown ASR provider is named
#[derive(Debug, Clone, Error)]
#[error("Invalid provider: \"{input}\". Valid providers are: groq, assemblyai, gemini")]
pub struct InvalidProviderError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when an audio duration cannot be partitioned into segments
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplitError {
    #[error("Audio duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f64),

    #[error("Maximum segment size must be greater than zero")]
    ZeroSizeLimit,

    #[error("Encoding bitrate must be greater than zero")]
    ZeroBitrate,
}

/// Error when splicing text into an assembled transcript
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Transcript has {lines} lines, cannot replace line {index}")]
    LineOutOfRange { index: usize, lines: usize },
}
