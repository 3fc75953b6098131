//! End-to-end workflow tests
//!
//! The provider side runs against a wiremock server speaking the Groq
//! protocol. Media handling is stubbed except in the ffmpeg test, which
//! needs ffmpeg on PATH.
//! Run that one with: cargo test --test transcription_tests -- --ignored

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use segment_scribe::application::ports::{MediaError, MediaToolkit, SessionStore};
use segment_scribe::application::{
    RetryPolicy, RetryRequest, TranscribeCallbacks, TranscribeInput, TranscribeMediaUseCase,
};
use segment_scribe::domain::media::AudioEncoding;
use segment_scribe::domain::segmentation::Window;
use segment_scribe::domain::transcript::{BatchStatus, TranscriptionSession, ERROR_MARKER};
use segment_scribe::domain::ProviderId;
use segment_scribe::infrastructure::{FfmpegToolkit, GroqTranscriber, JsonSessionStore};

const MB: u64 = 1024 * 1024;

/// Pretends to be ffmpeg: the extracted audio is a sparse file of the
/// requested size and each segment file names its start offset.
struct FakeMedia {
    audio_bytes: u64,
    duration_secs: f64,
}

#[async_trait]
impl MediaToolkit for FakeMedia {
    async fn extract_audio(
        &self,
        _input: &Path,
        output: &Path,
        _encoding: &AudioEncoding,
    ) -> Result<(), MediaError> {
        let file = std::fs::File::create(output).map_err(|e| MediaError::Io(e.to_string()))?;
        file.set_len(self.audio_bytes)
            .map_err(|e| MediaError::Io(e.to_string()))
    }

    async fn probe_duration(&self, _path: &Path) -> Result<f64, MediaError> {
        Ok(self.duration_secs)
    }

    async fn encode_segment(
        &self,
        _input: &Path,
        output: &Path,
        window: &Window,
        _encoding: &AudioEncoding,
    ) -> Result<(), MediaError> {
        std::fs::write(output, format!("segment@{}", window.start_secs as u64))
            .map_err(|e| MediaError::Io(e.to_string()))
    }
}

async fn mount_transcript(server: &MockServer, payload: &str, text: &str) {
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(body_string_contains(payload))
        .respond_with(ResponseTemplate::new(200).set_body_string(text))
        .mount(server)
        .await;
}

#[tokio::test]
async fn forty_minutes_over_groq_partial_then_retry() {
    let server = MockServer::start().await;

    // Segment 2 fails three times, then succeeds
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .and(body_string_contains("segment@1200"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(3)
        .with_priority(1)
        .expect(3)
        .mount(&server)
        .await;
    mount_transcript(&server, "segment@0", "First twenty minutes.").await;
    mount_transcript(&server, "segment@1200", "Second twenty minutes.").await;

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("lecture.mp4");
    std::fs::write(&source, b"video").unwrap();
    let work_dir = dir.path().join("run");

    let use_case = TranscribeMediaUseCase::new(
        FakeMedia {
            audio_bytes: 40 * MB,
            duration_secs: 2400.0,
        },
        GroqTranscriber::new("gsk_test").with_base_url(server.uri()),
        RetryPolicy::immediate(3),
    );

    let report = use_case
        .execute(
            TranscribeInput {
                source: source.clone(),
                work_dir: work_dir.clone(),
                max_segment_bytes: 25 * MB,
                encoding: AudioEncoding::default(),
            },
            &TranscribeCallbacks::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, BatchStatus::Partial);
    assert_eq!(report.total(), 2);
    assert_eq!(report.succeeded(), 1);
    assert!((report.segments[1].start_secs - 1200.0).abs() < 1e-6);
    assert_eq!(report.failures[0].attempts, 3);
    assert!(report.failures[0].message.contains("503"));

    let lines: Vec<&str> = report.text.lines().collect();
    assert_eq!(lines[0], "First twenty minutes.");
    assert!(lines[1].contains(ERROR_MARKER));
    assert!(lines[1].contains("segment 2"));

    // Segment 1 is gone, segment 2 is retained for retry
    assert!(!report.segments[0].path().exists());
    assert!(report.segments[1].path().exists());

    // Persist and reload the session the way the CLI does
    let store = JsonSessionStore::new();
    let session_path = JsonSessionStore::path_in(&work_dir);
    let session = TranscriptionSession {
        source,
        provider: ProviderId::Groq,
        created_at_ms: 0,
        segments: report.segments,
        failures: report.failures,
        text: report.text,
        status: report.status,
    };
    store.save(&session_path, &session).await.unwrap();
    let mut session = store.load(&session_path).await.unwrap();

    let retry = use_case
        .retry_failed(
            RetryRequest {
                segments: session.segments.clone(),
                failures: session.failures.clone(),
                only: None,
                text: session.text.clone(),
            },
            &TranscribeCallbacks::default(),
        )
        .await
        .unwrap();

    assert_eq!(retry.status, BatchStatus::Completed);
    assert_eq!(retry.recovered, vec![1]);
    assert_eq!(retry.text, "First twenty minutes.\nSecond twenty minutes.");
    assert!(!retry.text.contains(ERROR_MARKER));

    session.apply_retry(retry.text, retry.failures);
    assert!(session.is_settled());
    assert!(!session.segments[1].path().exists());
}

#[tokio::test]
async fn invalid_key_fails_every_segment_without_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let source = dir.path().join("call.wav");
    std::fs::write(&source, b"wav").unwrap();

    let use_case = TranscribeMediaUseCase::new(
        FakeMedia {
            audio_bytes: 40 * MB,
            duration_secs: 2400.0,
        },
        GroqTranscriber::new("wrong").with_base_url(server.uri()),
        RetryPolicy::immediate(3),
    );

    let report = use_case
        .execute(
            TranscribeInput {
                source,
                work_dir: dir.path().join("run"),
                max_segment_bytes: 25 * MB,
                encoding: AudioEncoding::default(),
            },
            &TranscribeCallbacks::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.status, BatchStatus::Failed);
    assert!(report.failures.iter().all(|f| f.attempts == 1));
    assert!(report
        .failures
        .iter()
        .all(|f| f.message.contains("Invalid API key")));
}

#[tokio::test]
#[ignore = "requires ffmpeg and ffprobe on PATH"]
async fn ffmpeg_extracts_probes_and_encodes() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("tone.wav");

    let status = std::process::Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-f", "lavfi", "-i"])
        .arg("sine=frequency=440:duration=6")
        .arg(&source)
        .status()
        .expect("ffmpeg should run");
    assert!(status.success());

    let toolkit = FfmpegToolkit::new();
    let encoding = AudioEncoding::default();
    let audio = dir.path().join("audio.mp3");

    toolkit.extract_audio(&source, &audio, &encoding).await.unwrap();
    let duration = toolkit.probe_duration(&audio).await.unwrap();
    assert!((duration - 6.0).abs() < 0.5, "duration was {}", duration);

    let segment = dir.path().join("segment_002.mp3");
    let window = Window {
        start_secs: 3.0,
        duration_secs: 3.0,
    };
    toolkit
        .encode_segment(&audio, &segment, &window, &encoding)
        .await
        .unwrap();

    let segment_duration = toolkit.probe_duration(&segment).await.unwrap();
    assert!((segment_duration - 3.0).abs() < 0.5);
}
