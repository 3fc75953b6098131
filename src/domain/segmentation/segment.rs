//! Segment entity

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A time-bounded slice of an audio file, encoded to its own file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Zero-based position within the run
    pub index: usize,
    /// Encoded audio file for this slice
    pub path: PathBuf,
    /// Offset of the slice in the source audio
    pub start_secs: f64,
    /// Length of the slice
    pub duration_secs: f64,
}

impl Segment {
    pub fn new(index: usize, path: impl Into<PathBuf>, start_secs: f64, duration_secs: f64) -> Self {
        Self {
            index,
            path: path.into(),
            start_secs,
            duration_secs,
        }
    }

    /// One-based number shown to users
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Offset at which the slice ends
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}
