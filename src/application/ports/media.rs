//! Media toolkit port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::AudioEncoding;
use crate::domain::segmentation::Window;

/// Media processing errors
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("{0} not found. Please install FFmpeg.")]
    ToolNotFound(String),

    #[error("{tool} failed: {message}")]
    CommandFailed { tool: String, message: String },

    #[error("Could not determine audio duration: {0}")]
    ProbeFailed(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Port for audio extraction, probing and segment encoding
#[async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Extract the audio track of `input` into `output`, re-encoded.
    async fn extract_audio(
        &self,
        input: &Path,
        output: &Path,
        encoding: &AudioEncoding,
    ) -> Result<(), MediaError>;

    /// Duration of a media file in seconds.
    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError>;

    /// Encode one window of `input` into its own file.
    async fn encode_segment(
        &self,
        input: &Path,
        output: &Path,
        window: &Window,
        encoding: &AudioEncoding,
    ) -> Result<(), MediaError>;
}
