//! App runners for the transcribe, retry and discard commands

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use indicatif::ProgressBar;

use crate::application::ports::{ConfigStore, SessionStore};
use crate::application::{
    discard_segments, remove_dir_if_empty, RetryPolicy, RetryRequest, TranscribeCallbacks,
    TranscribeError, TranscribeInput, TranscribeMediaUseCase,
};
use crate::domain::config::AppConfig;
use crate::domain::provider::ProviderId;
use crate::domain::transcript::{BatchStatus, TranscriptionSession};
use crate::infrastructure::{
    config::APP_DIR_NAME, create_transcriber, provider_ceiling, FfmpegToolkit, JsonSessionStore,
};

use super::args::{segment_indices, TranscribeArgs};
use super::presenter::{format_summary, segment_message, Presenter};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;
pub const EXIT_PARTIAL: u8 = 3;

/// Exit code for a finished batch
pub fn exit_code_for(status: BatchStatus) -> u8 {
    match status {
        BatchStatus::Completed => EXIT_SUCCESS,
        BatchStatus::Partial => EXIT_PARTIAL,
        BatchStatus::Failed => EXIT_ERROR,
    }
}

fn exit_code_for_error(error: &TranscribeError) -> u8 {
    match error {
        TranscribeError::UnknownSegment(_)
        | TranscribeError::SegmentNotFailed(_)
        | TranscribeError::Unrecoverable(_) => EXIT_USAGE_ERROR,
        _ => EXIT_ERROR,
    }
}

/// Load and merge configuration: defaults < file < env < cli
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load_or_empty().await;

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}

/// API keys from the environment
fn env_config() -> AppConfig {
    let var = |provider: ProviderId| {
        env::var(provider.api_key_env())
            .ok()
            .filter(|s| !s.is_empty())
    };

    AppConfig {
        groq_api_key: var(ProviderId::Groq),
        assemblyai_api_key: var(ProviderId::AssemblyAi),
        gemini_api_key: var(ProviderId::Gemini),
        ..Default::default()
    }
}

/// Fresh per-run work directory under `base`, or under the user cache dir.
/// Files already in `base` are never touched.
pub fn run_work_dir(base: Option<PathBuf>) -> PathBuf {
    let base = base.unwrap_or_else(|| {
        dirs::cache_dir()
            .unwrap_or_else(env::temp_dir)
            .join(APP_DIR_NAME)
    });
    base.join(format!("run-{}", now_millis()))
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn retry_policy(config: &AppConfig) -> RetryPolicy {
    RetryPolicy::new(
        config.max_attempts_or_default(),
        config.backoff_base_or_default(),
    )
}

/// Progress callbacks that drive the presenter's spinner
fn spinner_callbacks(spinner: Option<ProgressBar>) -> TranscribeCallbacks {
    let Some(spinner) = spinner else {
        return TranscribeCallbacks::default();
    };

    let on_extract_start = spinner.clone();
    let on_extract_end = spinner.clone();
    let on_split = spinner.clone();
    let on_segment_start = spinner.clone();
    let on_segment_end = spinner;

    TranscribeCallbacks {
        on_extract_start: Some(Box::new(move || {
            on_extract_start.set_message("Extracting audio...");
        })),
        on_extract_end: Some(Box::new(move |size: &str| {
            on_extract_end.println(format!("  audio extracted ({})", size));
        })),
        on_split: Some(Box::new(move |count: usize| {
            if count > 1 {
                on_split.println(format!("  split into {} segments", count));
            }
        })),
        on_segment_start: Some(Box::new(move |number: usize, total: usize| {
            on_segment_start.set_message(segment_message(number, total));
        })),
        on_segment_end: Some(Box::new(move |number: usize, ok: bool| {
            if !ok {
                on_segment_end.println(format!("  segment {} failed", number));
            }
        })),
    }
}

async fn write_output(
    presenter: &Presenter,
    output: Option<&Path>,
    text: &str,
) -> Result<(), String> {
    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{}\n", text))
                .await
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            presenter.info(&format!("Transcript written to {}", path.display()));
        }
        None => presenter.output(text),
    }
    Ok(())
}

/// Run `transcribe`
pub async fn run_transcribe<S: ConfigStore>(args: TranscribeArgs, store: &S) -> ExitCode {
    let mut presenter = Presenter::new();

    let cli_config = AppConfig {
        provider: args.provider.map(|p| ProviderId::from(p).to_string()),
        max_segment_mb: args.max_segment_mb,
        ..Default::default()
    };
    let config = load_merged_config(store, cli_config).await;
    let provider = config.provider_or_default();

    let transcriber = match create_transcriber(provider, &config) {
        Ok(t) => t,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let work_dir = run_work_dir(args.work_dir.clone().or_else(|| config.work_dir()));
    let input = TranscribeInput {
        source: args.input.clone(),
        work_dir: work_dir.clone(),
        max_segment_bytes: config.max_segment_bytes(provider_ceiling(provider)),
        encoding: config.encoding_or_default(),
    };

    tracing::debug!(
        provider = %provider,
        work_dir = %work_dir.display(),
        max_segment_bytes = input.max_segment_bytes,
        "Starting transcription"
    );

    let use_case =
        TranscribeMediaUseCase::new(FfmpegToolkit::new(), transcriber, retry_policy(&config));

    presenter.start_spinner("Preparing...");
    let callbacks = spinner_callbacks(presenter.spinner_handle());

    let report = match use_case.execute(input, &callbacks).await {
        Ok(report) => report,
        Err(e) => {
            presenter.spinner_fail("Transcription aborted");
            presenter.error(&e.to_string());
            remove_dir_if_empty(&work_dir).await;
            return ExitCode::from(exit_code_for_error(&e));
        }
    };

    let summary = format_summary(report.status, report.succeeded(), report.total());
    match report.status {
        BatchStatus::Completed => presenter.spinner_success(&summary),
        _ => presenter.spinner_fail(&summary),
    }

    if report.status != BatchStatus::Failed {
        if let Err(e) = write_output(&presenter, args.output.as_deref(), &report.text).await {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if !report.failures.is_empty() {
        presenter.failures(&report.failures);

        let session = TranscriptionSession {
            source: args.input,
            provider,
            created_at_ms: now_millis(),
            segments: report.segments,
            failures: report.failures,
            text: report.text,
            status: report.status,
        };
        let session_path = JsonSessionStore::path_in(&work_dir);
        match JsonSessionStore::new().save(&session_path, &session).await {
            Ok(()) => presenter.retry_hint(&session_path),
            Err(e) => presenter.warn(&format!("Could not save retry session: {}", e)),
        }
    }

    ExitCode::from(exit_code_for(report.status))
}

/// Run `retry`
pub async fn run_retry<S: ConfigStore>(
    session_path: &Path,
    only: Option<Vec<usize>>,
    output: Option<&Path>,
    store: &S,
) -> ExitCode {
    let mut presenter = Presenter::new();
    let sessions = JsonSessionStore::new();

    let only = match only.as_deref().map(segment_indices).transpose() {
        Ok(only) => only,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let mut session = match sessions.load(session_path).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let config = load_merged_config(store, AppConfig::empty()).await;
    let transcriber = match create_transcriber(session.provider, &config) {
        Ok(t) => t,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let use_case =
        TranscribeMediaUseCase::new(FfmpegToolkit::new(), transcriber, retry_policy(&config));
    let request = RetryRequest {
        segments: session.segments.clone(),
        failures: session.failures.clone(),
        only,
        text: session.text.clone(),
    };

    presenter.start_spinner("Retrying failed segments...");
    let callbacks = spinner_callbacks(presenter.spinner_handle());

    let report = match use_case.retry_failed(request, &callbacks).await {
        Ok(report) => report,
        Err(e) => {
            presenter.stop_spinner();
            presenter.error(&e.to_string());
            return ExitCode::from(exit_code_for_error(&e));
        }
    };

    session.apply_retry(report.text, report.failures);
    let summary = format_summary(session.status, session.succeeded(), session.total());
    match session.status {
        BatchStatus::Completed => presenter.spinner_success(&summary),
        _ => presenter.spinner_fail(&summary),
    }
    if !report.recovered.is_empty() {
        presenter.info(&format!("Recovered {} segment(s)", report.recovered.len()));
    }

    if session.status != BatchStatus::Failed {
        if let Err(e) = write_output(&presenter, output, &session.text).await {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if session.is_settled() {
        if let Err(e) = sessions.remove(session_path).await {
            presenter.warn(&e.to_string());
        }
        if let Some(dir) = session_path.parent() {
            remove_dir_if_empty(dir).await;
        }
    } else {
        presenter.failures(&session.failures);
        match sessions.save(session_path, &session).await {
            Ok(()) => presenter.retry_hint(session_path),
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    ExitCode::from(exit_code_for(session.status))
}

/// Run `discard`
pub async fn run_discard(session_path: &Path) -> ExitCode {
    let presenter = Presenter::new();
    let sessions = JsonSessionStore::new();

    let session = match sessions.load(session_path).await {
        Ok(session) => session,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let removed = discard_segments(&session.retained_segments()).await;

    if let Err(e) = sessions.remove(session_path).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    if let Some(dir) = session_path.parent() {
        remove_dir_if_empty(dir).await;
    }

    presenter.success(&format!(
        "Discarded session ({} segment file(s) removed)",
        removed
    ));
    ExitCode::from(EXIT_SUCCESS)
}
