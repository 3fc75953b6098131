//! CLI presenter for output formatting

use std::path::Path;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::transcript::{BatchStatus, SegmentFailure};

/// Presenter for CLI output formatting.
///
/// Status goes to stderr; stdout only ever carries transcript text.
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Shared handle to the running spinner, for progress callbacks
    pub fn spinner_handle(&self) -> Option<ProgressBar> {
        self.spinner.clone()
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout (the actual transcription output)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the outcome of a batch or retry pass
    pub fn batch_summary(&self, status: BatchStatus, succeeded: usize, total: usize) {
        let line = format_summary(status, succeeded, total);
        match status {
            BatchStatus::Completed => self.success(&line),
            BatchStatus::Partial => self.warn(&line),
            BatchStatus::Failed => self.error(&line),
        }
    }

    /// List failed segments, one per line
    pub fn failures(&self, failures: &[SegmentFailure]) {
        for failure in failures {
            eprintln!("  {} {}", "•".red(), failure);
        }
    }

    /// Tell the user how to continue a run with retained segments
    pub fn retry_hint(&self, session: &Path) {
        self.info(&format!("Session saved to {}", session.display()));
        eprintln!(
            "  retry with:   {}",
            format!("segment-scribe retry {}", session.display()).bold()
        );
        eprintln!(
            "  or give up:   {}",
            format!("segment-scribe discard {}", session.display()).dimmed()
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line batch summary
pub fn format_summary(status: BatchStatus, succeeded: usize, total: usize) -> String {
    match status {
        BatchStatus::Completed if total == 1 => "Transcription complete".to_string(),
        BatchStatus::Completed => format!("All {} segments transcribed", total),
        BatchStatus::Partial => format!(
            "Partial transcription: {} of {} segments succeeded",
            succeeded, total
        ),
        BatchStatus::Failed => format!("Transcription failed: 0 of {} segments succeeded", total),
    }
}

/// Spinner message for a segment in flight
pub fn segment_message(number: usize, total: usize) -> String {
    if total == 1 {
        "Transcribing...".to_string()
    } else {
        format!("Transcribing segment {}/{}...", number, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_for_each_status() {
        assert_eq!(
            format_summary(BatchStatus::Completed, 1, 1),
            "Transcription complete"
        );
        assert_eq!(
            format_summary(BatchStatus::Completed, 4, 4),
            "All 4 segments transcribed"
        );
        assert!(format_summary(BatchStatus::Partial, 1, 2).contains("1 of 2"));
        assert!(format_summary(BatchStatus::Failed, 0, 3).contains("0 of 3"));
    }

    #[test]
    fn segment_message_hides_count_for_single_segment() {
        assert_eq!(segment_message(1, 1), "Transcribing...");
        assert_eq!(segment_message(2, 5), "Transcribing segment 2/5...");
    }
}
