//! Speech-to-text provider adapters

mod assemblyai;
mod gemini;
mod groq;

pub use assemblyai::{AssemblyAiTranscriber, ASSEMBLYAI_MAX_UPLOAD_BYTES};
pub use gemini::{GeminiTranscriber, GEMINI_MAX_UPLOAD_BYTES};
pub use groq::{GroqTranscriber, GROQ_MAX_UPLOAD_BYTES};

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::application::TranscribeError;
use crate::domain::config::AppConfig;
use crate::domain::media::Duration;
use crate::domain::provider::ProviderId;

/// Create the transcriber for a provider, using its API key and request
/// timeout from the merged configuration.
pub fn create_transcriber(
    provider: ProviderId,
    config: &AppConfig,
) -> Result<Box<dyn Transcriber>, TranscribeError> {
    let api_key = config
        .api_key_for(provider)
        .ok_or_else(|| TranscribeError::missing_api_key(provider))?;
    let timeout = config.request_timeout_or_default();
    let client = http_client(timeout)?;

    let transcriber: Box<dyn Transcriber> = match provider {
        ProviderId::Groq => Box::new(GroqTranscriber::new(api_key).with_client(client)),
        ProviderId::AssemblyAi => Box::new(
            AssemblyAiTranscriber::new(api_key)
                .with_client(client)
                .with_max_wait(timeout),
        ),
        ProviderId::Gemini => Box::new(GeminiTranscriber::new(api_key).with_client(client)),
    };

    tracing::debug!(provider = %provider, timeout = %timeout, "Transcriber created");
    Ok(transcriber)
}

/// HTTP client whose every request, upload included, is bounded by `timeout`
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, TranscribeError> {
    reqwest::Client::builder()
        .timeout(timeout.as_std())
        .build()
        .map_err(|e| TranscribeError::HttpClient(e.to_string()))
}

/// Upload ceiling of a provider without constructing a client
pub const fn provider_ceiling(provider: ProviderId) -> u64 {
    match provider {
        ProviderId::Groq => GROQ_MAX_UPLOAD_BYTES,
        ProviderId::AssemblyAi => ASSEMBLYAI_MAX_UPLOAD_BYTES,
        ProviderId::Gemini => GEMINI_MAX_UPLOAD_BYTES,
    }
}

fn map_send_error(e: reqwest::Error) -> TranscriptionError {
    if e.is_timeout() {
        TranscriptionError::Timeout(e.without_url().to_string())
    } else {
        TranscriptionError::RequestFailed(e.without_url().to_string())
    }
}

async fn read_error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}
