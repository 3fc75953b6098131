//! Target encoding for extracted audio and segments

use super::audio_data::AudioMimeType;

/// Default segment bitrate in kbit/s (speech-quality mono MP3)
pub const DEFAULT_BITRATE_KBPS: u32 = 64;

/// Sample rate expected by the ASR providers
pub const SAMPLE_RATE_HZ: u32 = 16_000;

/// Encoding parameters handed to the transcoder.
///
/// The bitrate is also what segment size estimates are computed from,
/// so it must match what the transcoder actually produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioEncoding {
    bitrate_kbps: u32,
    sample_rate_hz: u32,
    channels: u8,
}

impl AudioEncoding {
    /// Mono 16kHz MP3 at the given bitrate
    pub const fn mp3(bitrate_kbps: u32) -> Self {
        Self {
            bitrate_kbps,
            sample_rate_hz: SAMPLE_RATE_HZ,
            channels: 1,
        }
    }

    pub const fn bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
    }

    pub const fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub const fn channels(&self) -> u8 {
        self.channels
    }

    /// Encoded bytes produced per second of audio
    pub fn bytes_per_sec(&self) -> f64 {
        self.bitrate_kbps as f64 * 1000.0 / 8.0
    }

    /// Estimated encoded size of `secs` seconds of audio
    pub fn estimated_bytes(&self, secs: f64) -> f64 {
        secs * self.bytes_per_sec()
    }

    pub const fn mime_type(&self) -> AudioMimeType {
        AudioMimeType::Mp3
    }

    /// Codec name understood by ffmpeg
    pub const fn codec(&self) -> &'static str {
        "libmp3lame"
    }
}

impl Default for AudioEncoding {
    fn default() -> Self {
        Self::mp3(DEFAULT_BITRATE_KBPS)
    }
}
