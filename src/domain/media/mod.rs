//! Media domain module

mod audio_data;
mod duration;
mod encoding;

pub use audio_data::{human_readable_bytes, AudioData, AudioMimeType};
pub use duration::{
    Duration, DEFAULT_BACKOFF_BASE_SECS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use encoding::{AudioEncoding, DEFAULT_BITRATE_KBPS, SAMPLE_RATE_HZ};
