//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::AudioData;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Audio rejected as too large: {0}")]
    PayloadTooLarge(String),

    #[error("Empty transcription response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Transcription job failed: {0}")]
    ProviderFailed(String),

    #[error("Timed out waiting for transcript: {0}")]
    Timeout(String),
}

impl TranscriptionError {
    /// Whether repeating the same request could succeed.
    /// Bad credentials and rejected payloads fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidApiKey | Self::PayloadTooLarge(_))
    }
}

/// Port for speech-to-text providers
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Short provider name for logs and sessions
    fn name(&self) -> &'static str;

    /// Largest audio payload the provider accepts in one request
    fn max_upload_bytes(&self) -> u64;

    /// Transcribe audio data to text.
    ///
    /// # Arguments
    /// * `audio` - The audio data to transcribe
    ///
    /// # Returns
    /// The transcribed text or an error
    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError>;
}

#[async_trait]
impl<T: Transcriber + ?Sized> Transcriber for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn max_upload_bytes(&self) -> u64 {
        (**self).max_upload_bytes()
    }

    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        (**self).transcribe(audio).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(TranscriptionError::RateLimited.is_retryable());
        assert!(TranscriptionError::ApiError("HTTP 502".into()).is_retryable());
        assert!(TranscriptionError::RequestFailed("reset".into()).is_retryable());
        assert!(!TranscriptionError::InvalidApiKey.is_retryable());
        assert!(!TranscriptionError::PayloadTooLarge("26MB".into()).is_retryable());
    }
}
