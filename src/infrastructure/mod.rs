//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like FFmpeg, the ASR provider APIs,
//! and the filesystem.

pub mod config;
pub mod media;
pub mod observability;
pub mod session;
pub mod transcription;

// Re-export adapters
pub use config::XdgConfigStore;
pub use media::FfmpegToolkit;
pub use observability::init_tracing;
pub use session::JsonSessionStore;
pub use transcription::{
    create_transcriber, provider_ceiling, AssemblyAiTranscriber, GeminiTranscriber,
    GroqTranscriber,
};
