//! Transcript domain module

mod assembly;
mod outcome;
mod session;

pub use assembly::{
    assemble, format_timestamp, has_error_markers, normalize_line, splice, SegmentResult,
    TranscriptLayout, ERROR_MARKER, TIMESTAMP_THRESHOLD,
};
pub use outcome::{BatchStatus, FailureKind, SegmentFailure, SegmentOutcome};
pub use session::TranscriptionSession;
