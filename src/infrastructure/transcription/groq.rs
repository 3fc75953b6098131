//! Groq Whisper transcriber adapter (OpenAI-compatible endpoint)

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::media::AudioData;

use super::{map_send_error, read_error_body};

/// Groq API base URL
const API_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Whisper model to use
const DEFAULT_MODEL: &str = "whisper-large-v3";

/// Groq rejects uploads above 25 MB
pub const GROQ_MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Groq Whisper transcriber
pub struct GroqTranscriber {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GroqTranscriber {
    /// Create a new Groq transcriber with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at a different OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Use a preconfigured client, e.g. one from [`super::http_client`]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }

    fn build_form(&self, audio: &AudioData) -> Result<multipart::Form, TranscriptionError> {
        let file_part = multipart::Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| TranscriptionError::RequestFailed(format!("mime: {}", e)))?;

        Ok(multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part))
    }
}

#[async_trait]
impl Transcriber for GroqTranscriber {
    fn name(&self) -> &'static str {
        "groq"
    }

    fn max_upload_bytes(&self) -> u64 {
        GROQ_MAX_UPLOAD_BYTES
    }

    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        let form = self.build_form(audio)?;

        tracing::debug!(model = %self.model, size = audio.size_bytes(), "Sending audio to Groq");

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::PAYLOAD_TOO_LARGE {
            return Err(TranscriptionError::PayloadTooLarge(read_error_body(response).await));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status,
                read_error_body(response).await
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::EmptyResponse);
        }

        tracing::info!(chars = trimmed.len(), "Groq transcription completed");
        Ok(trimmed.to_string())
    }
}
