//! Persisted state of a run that still has segments to retry

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::provider::ProviderId;
use crate::domain::segmentation::Segment;

use super::outcome::{BatchStatus, SegmentFailure};

/// Everything a later `retry` needs: the run's segments, which of them
/// failed and why, and the assembled text to splice into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionSession {
    pub source: PathBuf,
    pub provider: ProviderId,
    pub created_at_ms: u64,
    pub segments: Vec<Segment>,
    pub failures: Vec<SegmentFailure>,
    pub text: String,
    pub status: BatchStatus,
}

impl TranscriptionSession {
    /// Zero-based indices of segments still flagged as failed
    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|f| f.index).collect()
    }

    /// Segments whose files are retained for retry
    pub fn retained_segments(&self) -> Vec<Segment> {
        self.segments
            .iter()
            .filter(|s| self.failures.iter().any(|f| f.index == s.index))
            .cloned()
            .collect()
    }

    pub fn total(&self) -> usize {
        self.segments.len()
    }

    pub fn succeeded(&self) -> usize {
        self.total().saturating_sub(self.failures.len())
    }

    /// Record the result of a retry pass
    pub fn apply_retry(&mut self, text: String, failures: Vec<SegmentFailure>) {
        self.text = text;
        self.failures = failures;
        self.status = BatchStatus::from_counts(self.succeeded(), self.total());
    }

    /// True once nothing is left to retry
    pub fn is_settled(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TranscriptionSession {
        TranscriptionSession {
            source: PathBuf::from("/videos/workshop.mp4"),
            provider: ProviderId::Groq,
            created_at_ms: 1_700_000_000_000,
            segments: vec![
                Segment::new(0, "/tmp/run/segment_001.mp3", 0.0, 1200.0),
                Segment::new(1, "/tmp/run/segment_002.mp3", 1200.0, 1200.0),
            ],
            failures: vec![SegmentFailure::provider(1, "HTTP 503", 3)],
            text: "hello\n[❌ ERROR: segment 2 failed - HTTP 503]".to_string(),
            status: BatchStatus::Partial,
        }
    }

    #[test]
    fn retained_segments_are_the_failed_ones() {
        let s = session();
        assert_eq!(s.failed_indices(), vec![1]);
        let retained = s.retained_segments();
        assert_eq!(retained.len(), 1);
        assert_eq!(retained[0].index, 1);
        assert_eq!(s.succeeded(), 1);
    }

    #[test]
    fn apply_retry_recomputes_status() {
        let mut s = session();
        s.apply_retry("hello\nworld".to_string(), Vec::new());
        assert_eq!(s.status, BatchStatus::Completed);
        assert!(s.is_settled());
    }

    #[test]
    fn json_round_trip_keeps_failures() {
        let s = session();
        let json = serde_json::to_string_pretty(&s).unwrap();
        assert!(json.contains("\"status\": \"partial\""));
        let back: TranscriptionSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
