//! Deterministic partitioning of an audio duration into segment windows

use crate::domain::error::SplitError;
use crate::domain::media::AudioEncoding;

/// Fraction of the size limit a window may fill, leaving room for
/// container overhead and encoder variance.
pub const SIZE_SAFETY_FACTOR: f64 = 0.9;

/// A contiguous slice of the source timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start_secs: f64,
    pub duration_secs: f64,
}

/// Ordered, contiguous windows covering the whole source duration.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPlan {
    windows: Vec<Window>,
    encoding: AudioEncoding,
}

impl SegmentPlan {
    /// Partition `total_secs` of audio so that each window's estimated
    /// encoded size stays under `max_bytes`.
    ///
    /// The window count is the larger of what the source file size implies
    /// and what the target encoding's bitrate implies, so a source encoded
    /// at a higher bitrate than the segments still splits at least as often
    /// as its size requires.
    pub fn compute(
        total_secs: f64,
        source_bytes: u64,
        max_bytes: u64,
        encoding: AudioEncoding,
    ) -> Result<Self, SplitError> {
        if !total_secs.is_finite() || total_secs <= 0.0 {
            return Err(SplitError::InvalidDuration(total_secs));
        }
        if max_bytes == 0 {
            return Err(SplitError::ZeroSizeLimit);
        }
        if encoding.bitrate_kbps() == 0 {
            return Err(SplitError::ZeroBitrate);
        }

        let budget = max_bytes as f64 * SIZE_SAFETY_FACTOR;
        let max_window_secs = budget / encoding.bytes_per_sec();

        let by_size = (source_bytes as f64 / max_bytes as f64).ceil() as usize;
        let by_duration = (total_secs / max_window_secs).ceil() as usize;
        let count = by_size.max(by_duration).max(1);

        let window_secs = total_secs / count as f64;
        let windows = (0..count)
            .map(|i| {
                let start_secs = window_secs * i as f64;
                // last window absorbs float rounding so the sum is exact
                let duration_secs = if i + 1 == count {
                    total_secs - start_secs
                } else {
                    window_secs
                };
                Window {
                    start_secs,
                    duration_secs,
                }
            })
            .collect();

        Ok(Self { windows, encoding })
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Largest estimated encoded size among the windows
    pub fn max_estimated_bytes(&self) -> f64 {
        self.windows
            .iter()
            .map(|w| self.encoding.estimated_bytes(w.duration_secs))
            .fold(0.0, f64::max)
    }

    /// Sum of all window durations
    pub fn total_secs(&self) -> f64 {
        self.windows.iter().map(|w| w.duration_secs).sum()
    }
}
