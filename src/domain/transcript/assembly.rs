//! Assembling per-segment results into one transcript
//!
//! The assembled transcript has exactly one line per segment, in segment
//! order. That invariant is what lets a later retry replace a failed
//! segment's line by index without re-assembling the whole text.

use crate::domain::error::AssemblyError;
use crate::domain::segmentation::Segment;

use super::outcome::SegmentOutcome;

/// Marker that identifies a failed segment's line
pub const ERROR_MARKER: &str = "❌ ERROR";

/// Transcripts with more segments than this get `[MM:SS]` prefixes
pub const TIMESTAMP_THRESHOLD: usize = 3;

/// A segment paired with its transcription outcome
#[derive(Debug, Clone)]
pub struct SegmentResult {
    pub segment: Segment,
    pub outcome: SegmentOutcome,
}

impl SegmentResult {
    pub fn new(segment: Segment, outcome: SegmentOutcome) -> Self {
        Self { segment, outcome }
    }
}

/// Line rendering rules for one run's segments.
#[derive(Debug, Clone)]
pub struct TranscriptLayout {
    /// Segment indices in line order
    indices: Vec<usize>,
    /// Cumulative start offset of each line
    starts: Vec<f64>,
    timestamps: bool,
}

impl TranscriptLayout {
    /// Build the layout from the run's full segment list.
    pub fn new(segments: &[Segment]) -> Self {
        let mut ordered: Vec<&Segment> = segments.iter().collect();
        ordered.sort_by_key(|s| s.index);

        let mut elapsed = 0.0;
        let mut starts = Vec::with_capacity(ordered.len());
        for segment in &ordered {
            starts.push(elapsed);
            elapsed += segment.duration_secs;
        }

        Self {
            indices: ordered.iter().map(|s| s.index).collect(),
            starts,
            timestamps: ordered.len() > TIMESTAMP_THRESHOLD,
        }
    }

    /// Line position of a segment, if it belongs to this layout
    pub fn line_of(&self, segment_index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == segment_index)
    }

    pub fn has_timestamps(&self) -> bool {
        self.timestamps
    }

    /// Render the line for one segment.
    pub fn render(&self, segment_index: usize, outcome: &SegmentOutcome) -> String {
        let body = match outcome {
            Ok(text) => normalize_line(text),
            Err(failure) => format!(
                "[{}: segment {} failed - {}]",
                ERROR_MARKER,
                segment_index + 1,
                normalize_line(&failure.message)
            ),
        };

        match self.line_of(segment_index).filter(|_| self.timestamps) {
            Some(line) => format!("{} {}", format_timestamp(self.starts[line]), body),
            None => body,
        }
    }
}

/// Concatenate results in segment order, one line each.
///
/// Failed segments become a visible error marker line. With more than
/// [`TIMESTAMP_THRESHOLD`] segments every line carries an approximate start
/// time computed from the cumulative durations of the preceding segments.
pub fn assemble(results: &[SegmentResult]) -> String {
    let segments: Vec<Segment> = results.iter().map(|r| r.segment.clone()).collect();
    let layout = TranscriptLayout::new(&segments);

    let mut ordered: Vec<&SegmentResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.segment.index);

    ordered
        .iter()
        .map(|r| layout.render(r.segment.index, &r.outcome))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace line `line_index` of `text` with `line`.
pub fn splice(text: &str, line_index: usize, line: &str) -> Result<String, AssemblyError> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let count = lines.len();
    let slot = lines
        .get_mut(line_index)
        .ok_or(AssemblyError::LineOutOfRange {
            index: line_index,
            lines: count,
        })?;
    *slot = line;
    Ok(lines.join("\n"))
}

/// Whether any line of the transcript is an error marker
pub fn has_error_markers(text: &str) -> bool {
    text.contains(ERROR_MARKER)
}

/// Format an offset as `[MM:SS]`; minutes keep counting past 59.
pub fn format_timestamp(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("[{:02}:{:02}]", total / 60, total % 60)
}

/// Collapse all whitespace runs (including newlines) into single spaces.
pub fn normalize_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
