//! Segmented transcription use case

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::domain::error::{AssemblyError, SplitError};
use crate::domain::media::{human_readable_bytes, AudioData, AudioEncoding, AudioMimeType};
use crate::domain::segmentation::{Segment, SegmentPlan};
use crate::domain::transcript::{
    assemble, splice, BatchStatus, SegmentFailure, SegmentOutcome, SegmentResult,
    TranscriptLayout,
};
use crate::domain::ProviderId;

use super::ports::{MediaError, MediaToolkit, Transcriber, TranscriptionError};
use super::retry::{retry_with_backoff, RetryError, RetryPolicy};

/// Errors from the transcribe use case.
///
/// Segment-level failures are not errors; they are reported in
/// [`TranscriptionReport::failures`]. These abort the whole run.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Media processing failed: {0}")]
    Media(#[from] MediaError),

    #[error("Cannot split audio: {0}")]
    Split(#[from] SplitError),

    #[error("Cannot update transcript: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Failed to set up HTTP client: {0}")]
    HttpClient(String),

    #[error("Failed to prepare work directory {}: {message}", path.display())]
    WorkDir { path: PathBuf, message: String },

    #[error("Missing API key for {provider}. Set {env} or run 'segment-scribe config set {config_key} <key>'")]
    MissingApiKey {
        provider: ProviderId,
        env: &'static str,
        config_key: &'static str,
    },

    #[error("No failed segments can be retried; use 'discard' to clean up")]
    NothingToRetry,

    #[error("Segment {0} is not part of this run")]
    UnknownSegment(usize),

    #[error("Segment {0} did not fail; only failed segments can be retried")]
    SegmentNotFailed(usize),

    #[error("Segment {0} cannot be retried: its file is missing or too large for the provider")]
    Unrecoverable(usize),
}

impl TranscribeError {
    pub fn missing_api_key(provider: ProviderId) -> Self {
        Self::MissingApiKey {
            provider,
            env: provider.api_key_env(),
            config_key: provider.api_key_config_key(),
        }
    }
}

/// Input parameters for a transcription run
#[derive(Debug, Clone)]
pub struct TranscribeInput {
    /// Video or audio file to transcribe
    pub source: PathBuf,
    /// Directory owned by this run for extracted audio and segments
    pub work_dir: PathBuf,
    /// Segment size limit; capped at the provider's upload ceiling
    pub max_segment_bytes: u64,
    pub encoding: AudioEncoding,
}

/// Result of a full transcription run
#[derive(Debug, Clone)]
pub struct TranscriptionReport {
    /// Assembled transcript, one line per segment
    pub text: String,
    pub status: BatchStatus,
    pub segments: Vec<Segment>,
    /// Still-failing segments, ordered by index
    pub failures: Vec<SegmentFailure>,
    /// Size of the extracted audio
    pub audio_bytes: u64,
    pub duration_secs: f64,
}

impl TranscriptionReport {
    pub fn total(&self) -> usize {
        self.segments.len()
    }

    pub fn succeeded(&self) -> usize {
        self.total().saturating_sub(self.failures.len())
    }
}

/// Which failed segments to retry, and the state they belong to
#[derive(Debug, Clone)]
pub struct RetryRequest {
    /// All segments of the original run
    pub segments: Vec<Segment>,
    /// Failures recorded so far
    pub failures: Vec<SegmentFailure>,
    /// Zero-based indices to retry; every recoverable failure when `None`
    pub only: Option<Vec<usize>>,
    /// Previously assembled transcript
    pub text: String,
}

/// Result of a retry pass
#[derive(Debug, Clone)]
pub struct RetryReport {
    pub text: String,
    pub status: BatchStatus,
    /// Segments still failing, including ones not retried this pass
    pub failures: Vec<SegmentFailure>,
    /// Segments that succeeded this pass
    pub recovered: Vec<usize>,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct TranscribeCallbacks {
    /// Called when audio extraction starts
    pub on_extract_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the human-readable extracted audio size
    pub on_extract_end: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called with the number of segments to transcribe
    pub on_split: Option<Box<dyn Fn(usize) + Send + Sync>>,
    /// Called with (segment number, total) before each segment
    pub on_segment_start: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
    /// Called with (segment number, succeeded) after each segment
    pub on_segment_end: Option<Box<dyn Fn(usize, bool) + Send + Sync>>,
}

/// Provider-agnostic segmented transcription.
///
/// Segments are transcribed strictly one after another. A segment's file is
/// deleted as soon as it transcribes; files of failed segments stay on disk
/// until a retry succeeds or [`discard`](Self::discard) is called.
pub struct TranscribeMediaUseCase<M, T>
where
    M: MediaToolkit,
    T: Transcriber,
{
    media: M,
    transcriber: T,
    policy: RetryPolicy,
}

impl<M, T> TranscribeMediaUseCase<M, T>
where
    M: MediaToolkit,
    T: Transcriber,
{
    /// Create a new use case instance
    pub fn new(media: M, transcriber: T, policy: RetryPolicy) -> Self {
        Self {
            media,
            transcriber,
            policy,
        }
    }

    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    /// Extract, split if needed, transcribe every segment and assemble.
    pub async fn execute(
        &self,
        input: TranscribeInput,
        callbacks: &TranscribeCallbacks,
    ) -> Result<TranscriptionReport, TranscribeError> {
        if !fs::try_exists(&input.source).await.unwrap_or(false) {
            return Err(TranscribeError::SourceNotFound(input.source));
        }

        fs::create_dir_all(&input.work_dir)
            .await
            .map_err(|e| TranscribeError::WorkDir {
                path: input.work_dir.clone(),
                message: e.to_string(),
            })?;

        let audio_path = input
            .work_dir
            .join(format!("audio.{}", input.encoding.mime_type().extension()));

        let prepared = self.prepare_segments(&input, &audio_path, callbacks).await;
        let (segments, audio_bytes, duration_secs) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                // nothing is retained from an aborted run
                remove_file_logged(&audio_path).await;
                remove_dir_if_empty(&input.work_dir).await;
                return Err(e);
            }
        };

        if let Some(ref cb) = callbacks.on_split {
            cb(segments.len());
        }

        let mut results = Vec::with_capacity(segments.len());
        for segment in &segments {
            if let Some(ref cb) = callbacks.on_segment_start {
                cb(segment.number(), segments.len());
            }

            let outcome = self.transcribe_segment(segment).await;

            if let Some(ref cb) = callbacks.on_segment_end {
                cb(segment.number(), outcome.is_ok());
            }
            results.push(SegmentResult::new(segment.clone(), outcome));
        }

        let text = assemble(&results);
        let failures: Vec<SegmentFailure> = results
            .iter()
            .filter_map(|r| r.outcome.as_ref().err().cloned())
            .collect();
        let status = BatchStatus::from_counts(segments.len() - failures.len(), segments.len());

        tracing::info!(
            status = %status,
            succeeded = segments.len() - failures.len(),
            total = segments.len(),
            "Transcription finished"
        );

        if failures.is_empty() {
            remove_dir_if_empty(&input.work_dir).await;
        }

        Ok(TranscriptionReport {
            text,
            status,
            segments,
            failures,
            audio_bytes,
            duration_secs,
        })
    }

    /// Extract the audio track and cut it into segments when it exceeds the
    /// size limit. Returns the segments, the extracted size and duration.
    async fn prepare_segments(
        &self,
        input: &TranscribeInput,
        audio_path: &Path,
        callbacks: &TranscribeCallbacks,
    ) -> Result<(Vec<Segment>, u64, f64), TranscribeError> {
        if let Some(ref cb) = callbacks.on_extract_start {
            cb();
        }

        self.media
            .extract_audio(&input.source, audio_path, &input.encoding)
            .await?;

        let audio_bytes = fs::metadata(audio_path)
            .await
            .map_err(|e| MediaError::Io(e.to_string()))?
            .len();

        if let Some(ref cb) = callbacks.on_extract_end {
            cb(&human_readable_bytes(audio_bytes));
        }

        let duration_secs = self.media.probe_duration(audio_path).await?;
        let limit = input
            .max_segment_bytes
            .min(self.transcriber.max_upload_bytes());

        tracing::info!(
            provider = self.transcriber.name(),
            audio_bytes,
            limit,
            duration_secs,
            "Extracted audio"
        );

        let segments = if audio_bytes <= limit {
            vec![Segment::new(0, audio_path.to_path_buf(), 0.0, duration_secs)]
        } else {
            self.split(
                audio_path,
                duration_secs,
                audio_bytes,
                limit,
                &input.encoding,
                &input.work_dir,
            )
            .await?
        };

        Ok((segments, audio_bytes, duration_secs))
    }

    /// Encode `audio_path` into consecutive segment files under `work_dir`.
    ///
    /// The source audio is deleted once every segment is written. On error
    /// the segments written so far are removed and the source is kept.
    pub async fn split(
        &self,
        audio_path: &Path,
        total_secs: f64,
        source_bytes: u64,
        max_segment_bytes: u64,
        encoding: &AudioEncoding,
        work_dir: &Path,
    ) -> Result<Vec<Segment>, TranscribeError> {
        let plan = SegmentPlan::compute(total_secs, source_bytes, max_segment_bytes, *encoding)?;

        tracing::info!(
            segments = plan.len(),
            max_estimated_bytes = plan.max_estimated_bytes() as u64,
            "Splitting audio"
        );

        let mut segments = Vec::with_capacity(plan.len());
        for (index, window) in plan.windows().iter().enumerate() {
            let path = work_dir.join(format!(
                "segment_{:03}.{}",
                index + 1,
                encoding.mime_type().extension()
            ));

            if let Err(e) = self
                .media
                .encode_segment(audio_path, &path, window, encoding)
                .await
            {
                remove_file_logged(&path).await;
                self.discard(&segments).await;
                return Err(e.into());
            }

            tracing::debug!(
                segment = index + 1,
                start_secs = window.start_secs,
                duration_secs = window.duration_secs,
                "Encoded segment"
            );
            segments.push(Segment::new(
                index,
                path,
                window.start_secs,
                window.duration_secs,
            ));
        }

        remove_file_logged(audio_path).await;
        Ok(segments)
    }

    /// Transcribe one segment with bounded retries.
    ///
    /// Missing and oversized files fail without any network call. On success
    /// the segment file is deleted; on failure it is kept for a later retry.
    pub async fn transcribe_segment(&self, segment: &Segment) -> SegmentOutcome {
        let path = segment.path();

        let size = match fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SegmentFailure::missing_file(segment.index, path.display()));
            }
            Err(e) => {
                return Err(SegmentFailure::unreadable(segment.index, path.display(), e));
            }
        };

        let limit = self.transcriber.max_upload_bytes();
        if size > limit {
            tracing::warn!(segment = segment.number(), size, limit, "Segment exceeds upload limit");
            return Err(SegmentFailure::oversized(segment.index, size, limit));
        }

        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SegmentFailure::missing_file(segment.index, path.display()));
            }
            Err(e) => {
                return Err(SegmentFailure::unreadable(segment.index, path.display(), e));
            }
        };
        let audio = AudioData::new(bytes, AudioMimeType::from_path(path).unwrap_or_default());

        let operation = format!("{} segment {}", self.transcriber.name(), segment.number());
        let result = retry_with_backoff(
            &self.policy,
            &operation,
            |e: &TranscriptionError| e.is_retryable(),
            || self.transcriber.transcribe(&audio),
        )
        .await;

        match result {
            Ok(text) => {
                remove_file_logged(path).await;
                Ok(text)
            }
            Err(RetryError { error, attempts }) => Err(SegmentFailure::provider(
                segment.index,
                error.to_string(),
                attempts,
            )),
        }
    }

    /// Re-transcribe only the requested failed segments and splice their
    /// lines back into the previous transcript.
    pub async fn retry_failed(
        &self,
        request: RetryRequest,
        callbacks: &TranscribeCallbacks,
    ) -> Result<RetryReport, TranscribeError> {
        let RetryRequest {
            segments,
            failures,
            only,
            text,
        } = request;

        let targets: BTreeSet<usize> = match only {
            Some(indices) => indices.into_iter().collect(),
            None => failures
                .iter()
                .filter(|f| f.is_recoverable())
                .map(|f| f.index)
                .collect(),
        };
        if targets.is_empty() {
            return Err(TranscribeError::NothingToRetry);
        }

        for &index in &targets {
            if !segments.iter().any(|s| s.index == index) {
                return Err(TranscribeError::UnknownSegment(index + 1));
            }
            match failures.iter().find(|f| f.index == index) {
                None => return Err(TranscribeError::SegmentNotFailed(index + 1)),
                Some(failure) if !failure.is_recoverable() => {
                    return Err(TranscribeError::Unrecoverable(index + 1));
                }
                Some(_) => {}
            }
        }

        let layout = TranscriptLayout::new(&segments);
        let mut text = text;
        let mut remaining: Vec<SegmentFailure> = failures
            .into_iter()
            .filter(|f| !targets.contains(&f.index))
            .collect();
        let mut recovered = Vec::new();

        for &index in &targets {
            let Some(segment) = segments.iter().find(|s| s.index == index) else {
                continue;
            };
            let line = layout
                .line_of(index)
                .ok_or(TranscribeError::UnknownSegment(index + 1))?;

            if let Some(ref cb) = callbacks.on_segment_start {
                cb(segment.number(), targets.len());
            }

            let outcome = self.transcribe_segment(segment).await;

            if let Some(ref cb) = callbacks.on_segment_end {
                cb(segment.number(), outcome.is_ok());
            }

            text = splice(&text, line, &layout.render(index, &outcome))?;
            match outcome {
                Ok(_) => recovered.push(index),
                Err(failure) => remaining.push(failure),
            }
        }

        remaining.sort_by_key(|f| f.index);
        let status = BatchStatus::from_counts(segments.len() - remaining.len(), segments.len());

        tracing::info!(
            retried = targets.len(),
            recovered = recovered.len(),
            still_failing = remaining.len(),
            status = %status,
            "Retry finished"
        );

        Ok(RetryReport {
            text,
            status,
            failures: remaining,
            recovered,
        })
    }

    /// Abandon a run: delete every retained segment file. Returns how many
    /// files were removed.
    pub async fn discard(&self, segments: &[Segment]) -> usize {
        discard_segments(segments).await
    }
}

/// Delete the files of `segments`, ignoring ones already gone.
/// Returns how many files were removed.
pub async fn discard_segments(segments: &[Segment]) -> usize {
    let mut removed = 0;
    for segment in segments {
        match fs::remove_file(segment.path()).await {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %segment.path().display(),
                error = %e,
                "Failed to remove segment file"
            ),
        }
    }
    removed
}

async fn remove_file_logged(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove temp file");
        }
    }
}

/// Remove a run's work directory once nothing in it is retained.
pub async fn remove_dir_if_empty(dir: &Path) {
    // remove_dir refuses non-empty directories
    if fs::remove_dir(dir).await.is_ok() {
        tracing::debug!(path = %dir.display(), "Removed work directory");
    }
}
