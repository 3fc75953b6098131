//! AssemblyAI transcriber adapter
//!
//! AssemblyAI works in three steps: the raw audio is uploaded, a transcript
//! job is created for the returned URL, and the job is polled until it
//! settles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::media::{AudioData, Duration};

use super::{map_send_error, read_error_body};

/// AssemblyAI API base URL
const API_BASE_URL: &str = "https://api.assemblyai.com";

/// AssemblyAI accepts uploads up to 2.2 GB
pub const ASSEMBLYAI_MAX_UPLOAD_BYTES: u64 = 2_200 * 1024 * 1024;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    audio_url: &'a str,
    language_detection: bool,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
    status: JobStatus,
    text: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum JobStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

/// AssemblyAI transcriber
pub struct AssemblyAiTranscriber {
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_wait: Duration,
    client: reqwest::Client,
}

impl AssemblyAiTranscriber {
    /// Create a new AssemblyAI transcriber with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE_URL.to_string(),
            poll_interval: Duration::default_poll_interval(),
            max_wait: Duration::default_request_timeout(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Bound the total time spent polling one job
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    fn upload_url(&self) -> String {
        format!("{}/v2/upload", self.base_url)
    }

    fn transcript_url(&self) -> String {
        format!("{}/v2/transcript", self.base_url)
    }

    /// Map non-success statuses shared by every endpoint
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TranscriptionError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
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

        Ok(response)
    }

    async fn upload(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        let response = self
            .client
            .post(self.upload_url())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(audio.data().to_vec())
            .send()
            .await
            .map_err(map_send_error)?;

        let body: UploadResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        Ok(body.upload_url)
    }

    async fn create_job(&self, audio_url: &str) -> Result<TranscriptResponse, TranscriptionError> {
        let request = TranscriptRequest {
            audio_url,
            language_detection: true,
        };

        let response = self
            .client
            .post(self.transcript_url())
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))
    }

    async fn fetch_job(&self, id: &str) -> Result<TranscriptResponse, TranscriptionError> {
        let response = self
            .client
            .get(format!("{}/{}", self.transcript_url(), id))
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await
            .map_err(map_send_error)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))
    }

    /// Poll until the job completes, errors, or `max_wait` elapses
    async fn wait_for(&self, mut job: TranscriptResponse) -> Result<String, TranscriptionError> {
        let started = tokio::time::Instant::now();

        loop {
            match job.status {
                JobStatus::Completed => {
                    let text = job.text.unwrap_or_default();
                    let trimmed = text.trim();
                    if trimmed.is_empty() {
                        return Err(TranscriptionError::EmptyResponse);
                    }
                    return Ok(trimmed.to_string());
                }
                JobStatus::Error => {
                    return Err(TranscriptionError::ProviderFailed(
                        job.error.unwrap_or_else(|| "unknown error".to_string()),
                    ));
                }
                JobStatus::Queued | JobStatus::Processing => {}
            }

            if started.elapsed() >= self.max_wait.as_std() {
                return Err(TranscriptionError::Timeout(format!(
                    "job {} still {:?} after {}",
                    job.id, job.status, self.max_wait
                )));
            }

            tracing::debug!(job = %job.id, status = ?job.status, "Waiting for AssemblyAI transcript");
            tokio::time::sleep(self.poll_interval.as_std()).await;
            job = self.fetch_job(&job.id).await?;
        }
    }
}

#[async_trait]
impl Transcriber for AssemblyAiTranscriber {
    fn name(&self) -> &'static str {
        "assemblyai"
    }

    fn max_upload_bytes(&self) -> u64 {
        ASSEMBLYAI_MAX_UPLOAD_BYTES
    }

    async fn transcribe(&self, audio: &AudioData) -> Result<String, TranscriptionError> {
        tracing::debug!(size = audio.size_bytes(), "Uploading audio to AssemblyAI");
        let audio_url = self.upload(audio).await?;

        let job = self.create_job(&audio_url).await?;
        tracing::debug!(job = %job.id, "AssemblyAI transcript job created");

        let text = self.wait_for(job).await?;
        tracing::info!(chars = text.len(), "AssemblyAI transcription completed");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::AudioMimeType;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn audio() -> AudioData {
        AudioData::new(vec![9, 8, 7], AudioMimeType::Mp3)
    }

    fn transcriber(server: &MockServer) -> AssemblyAiTranscriber {
        AssemblyAiTranscriber::new("aai-key")
            .with_base_url(server.uri())
            .with_poll_interval(Duration::from_millis(10))
    }

    async fn mount_upload_and_create(server: &MockServer) {
        let upload_url = format!("{}/files/abc", server.uri());

        Mock::given(method("POST"))
            .and(path("/v2/upload"))
            .and(header("authorization", "aai-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "upload_url": upload_url })))
            .expect(1)
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/transcript"))
            .and(body_json(json!({ "audio_url": upload_url, "language_detection": true })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "t1", "status": "queued" })),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn polls_until_completed() {
        let server = MockServer::start().await;
        mount_upload_and_create(&server).await;

        Mock::given(method("GET"))
            .and(path("/v2/transcript/t1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "t1", "status": "processing" })),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v2/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t1",
                "status": "completed",
                "text": " The meeting starts now. "
            })))
            .mount(&server)
            .await;

        let text = transcriber(&server).transcribe(&audio()).await.unwrap();
        assert_eq!(text, "The meeting starts now.");
    }

    #[tokio::test]
    async fn job_error_is_provider_failure() {
        let server = MockServer::start().await;
        mount_upload_and_create(&server).await;

        Mock::given(method("GET"))
            .and(path("/v2/transcript/t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "t1",
                "status": "error",
                "error": "Audio file is corrupt"
            })))
            .mount(&server)
            .await;

        let err = transcriber(&server).transcribe(&audio()).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::ProviderFailed(ref m) if m.contains("corrupt")));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn gives_up_when_job_never_settles() {
        let server = MockServer::start().await;
        mount_upload_and_create(&server).await;

        Mock::given(method("GET"))
            .and(path("/v2/transcript/t1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": "t1", "status": "processing" })),
            )
            .mount(&server)
            .await;

        let err = transcriber(&server)
            .with_max_wait(Duration::from_millis(50))
            .transcribe(&audio())
            .await
            .unwrap_err();
        assert!(matches!(err, TranscriptionError::Timeout(_)));
    }

    #[tokio::test]
    async fn rejected_key_on_upload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/upload"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = transcriber(&server).transcribe(&audio()).await.unwrap_err();
        assert!(matches!(err, TranscriptionError::InvalidApiKey));
    }

    #[test]
    fn tolerates_large_uploads() {
        let transcriber = AssemblyAiTranscriber::new("key");
        assert!(transcriber.max_upload_bytes() > 2_000 * 1024 * 1024);
        assert_eq!(transcriber.upload_url(), "https://api.assemblyai.com/v2/upload");
    }
}
