//! FFmpeg/ffprobe media toolkit adapter

use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{MediaError, MediaToolkit};
use crate::domain::media::AudioEncoding;
use crate::domain::segmentation::Window;

/// Media toolkit backed by the `ffmpeg` and `ffprobe` executables
pub struct FfmpegToolkit {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegToolkit {
    /// Use `ffmpeg` and `ffprobe` from `PATH`
    pub fn new() -> Self {
        Self::with_binaries("ffmpeg", "ffprobe")
    }

    /// Use explicit executable names or paths
    pub fn with_binaries(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    /// Output encoding settings (optimized for speech)
    fn encoding_args(encoding: &AudioEncoding) -> Vec<OsString> {
        [
            "-vn".to_string(), // Drop any video stream
            "-ac".to_string(),
            encoding.channels().to_string(),
            "-ar".to_string(),
            encoding.sample_rate_hz().to_string(),
            "-c:a".to_string(),
            encoding.codec().to_string(),
            "-b:a".to_string(),
            format!("{}k", encoding.bitrate_kbps()),
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }

    fn build_extract_args(input: &Path, output: &Path, encoding: &AudioEncoding) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(input.as_os_str().to_owned());
        args.extend(Self::encoding_args(encoding));
        args.push(output.as_os_str().to_owned());
        args
    }

    fn build_segment_args(
        input: &Path,
        output: &Path,
        window: &Window,
        encoding: &AudioEncoding,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-y".into(),
            // -ss before -i seeks on the input, which is fast and accurate for audio
            "-ss".into(),
            format_secs(window.start_secs).into(),
            "-t".into(),
            format_secs(window.duration_secs).into(),
            "-i".into(),
            input.as_os_str().to_owned(),
        ];
        args.extend(Self::encoding_args(encoding));
        args.push(output.as_os_str().to_owned());
        args
    }

    fn build_probe_args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(path.as_os_str().to_owned());
        args
    }

    /// Run a tool to completion, mapping spawn and exit failures
    async fn run(tool: &str, args: &[OsString]) -> Result<Output, MediaError> {
        tracing::debug!(tool, ?args, "Running media tool");

        let output = Command::new(tool)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MediaError::ToolNotFound(tool.to_string())
                } else {
                    MediaError::CommandFailed {
                        tool: tool.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = last_line(&stderr)
                .map(str::to_string)
                .unwrap_or_else(|| format!("exited with {}", output.status));
            return Err(MediaError::CommandFailed {
                tool: tool.to_string(),
                message,
            });
        }

        Ok(output)
    }
}

impl Default for FfmpegToolkit {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn extract_audio(
        &self,
        input: &Path,
        output: &Path,
        encoding: &AudioEncoding,
    ) -> Result<(), MediaError> {
        let args = Self::build_extract_args(input, output, encoding);
        Self::run(&self.ffmpeg, &args).await?;
        Ok(())
    }

    async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        let args = Self::build_probe_args(path);
        let output = Self::run(&self.ffprobe, &args).await?;
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    async fn encode_segment(
        &self,
        input: &Path,
        output: &Path,
        window: &Window,
        encoding: &AudioEncoding,
    ) -> Result<(), MediaError> {
        let args = Self::build_segment_args(input, output, window, encoding);
        Self::run(&self.ffmpeg, &args).await?;
        Ok(())
    }
}

/// Parse ffprobe's bare duration output
fn parse_duration(stdout: &str) -> Result<f64, MediaError> {
    let value = stdout.lines().map(str::trim).find(|l| !l.is_empty());
    match value.and_then(|v| v.parse::<f64>().ok()) {
        Some(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(MediaError::ProbeFailed(format!(
            "unexpected ffprobe output: {:?}",
            stdout.trim()
        ))),
    }
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}

fn format_secs(secs: f64) -> String {
    format!("{:.3}", secs)
}
