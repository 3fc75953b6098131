//! Application layer - Use cases and port interfaces
//!
//! Contains the segmented transcription workflow, its retry policy,
//! and the trait definitions for external system interactions.

pub mod ports;
pub mod retry;
pub mod transcribe;

// Re-export use cases
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use transcribe::{
    discard_segments, remove_dir_if_empty, RetryReport, RetryRequest, TranscribeCallbacks,
    TranscribeError, TranscribeInput, TranscribeMediaUseCase, TranscriptionReport,
};
