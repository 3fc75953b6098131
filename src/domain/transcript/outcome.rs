//! Per-segment outcomes and batch status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a segment could not be transcribed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// The provider kept failing after all attempts
    Provider,
    /// The segment file exceeds the provider's upload ceiling
    Oversized { bytes: u64, limit: u64 },
    /// The segment file is gone; nothing left to retry this run
    MissingFile,
}

/// A segment that failed, with the latest error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentFailure {
    /// Zero-based segment index
    pub index: usize,
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
    /// Network attempts made; zero when rejected before any call
    pub attempts: u32,
}

impl SegmentFailure {
    pub fn provider(index: usize, message: impl Into<String>, attempts: u32) -> Self {
        Self {
            index,
            kind: FailureKind::Provider,
            message: message.into(),
            attempts,
        }
    }

    pub fn oversized(index: usize, bytes: u64, limit: u64) -> Self {
        Self {
            index,
            kind: FailureKind::Oversized { bytes, limit },
            message: format!(
                "segment is {} bytes, provider limit is {} bytes",
                bytes, limit
            ),
            attempts: 0,
        }
    }

    pub fn missing_file(index: usize, path: impl fmt::Display) -> Self {
        Self {
            index,
            kind: FailureKind::MissingFile,
            message: format!("segment file not found: {}", path),
            attempts: 0,
        }
    }

    /// The segment file exists but could not be read
    pub fn unreadable(index: usize, path: impl fmt::Display, error: impl fmt::Display) -> Self {
        Self {
            index,
            kind: FailureKind::MissingFile,
            message: format!("cannot read segment file {}: {}", path, error),
            attempts: 0,
        }
    }

    /// Whether another retry could possibly succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind, FailureKind::Provider)
    }

    /// One-based number shown to users
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {}: {}", self.number(), self.message)
    }
}

/// Result of transcribing one segment
pub type SegmentOutcome = Result<String, SegmentFailure>;

/// Overall result of a batch. Exactly one applies to any batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Every segment succeeded
    Completed,
    /// At least one, but not every, segment succeeded
    Partial,
    /// No segment succeeded
    Failed,
}

impl BatchStatus {
    pub fn from_counts(succeeded: usize, total: usize) -> Self {
        if total > 0 && succeeded == total {
            Self::Completed
        } else if succeeded > 0 {
            Self::Partial
        } else {
            Self::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Partial => "partial",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
