//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;

// Re-export commonly used types
pub use app::{
    run_discard, run_retry, run_transcribe, EXIT_ERROR, EXIT_PARTIAL, EXIT_SUCCESS,
    EXIT_USAGE_ERROR,
};
pub use args::{Cli, Commands, ConfigAction, ProviderArg, TranscribeArgs};
pub use presenter::Presenter;
