//! Audio data value object

use std::fmt;
use std::path::Path;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioMimeType {
    #[default]
    Mp3,
    Ogg,
    Wav,
    Flac,
    Webm,
    Mp4,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
            Self::Webm => "audio/webm",
            Self::Mp4 => "audio/mp4",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Webm => "webm",
            Self::Mp4 => "m4a",
        }
    }

    /// Guess the MIME type from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "ogg" | "opus" => Some(Self::Ogg),
            "wav" => Some(Self::Wav),
            "flac" => Some(Self::Flac),
            "webm" => Some(Self::Webm),
            "m4a" | "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Value object representing audio data ready for transcription.
/// Contains raw audio bytes and its MIME type.
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    /// Create AudioData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// File name sent with multipart uploads
    pub fn file_name(&self) -> String {
        format!("audio.{}", self.mime_type.extension())
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        human_readable_bytes(self.size_bytes() as u64)
    }

    /// Encode the audio data as base64
    pub fn to_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }
}

/// Format a byte count as B, KB or MB
pub fn human_readable_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_as_str_and_extension() {
        assert_eq!(AudioMimeType::Mp3.as_str(), "audio/mpeg");
        assert_eq!(AudioMimeType::Mp3.extension(), "mp3");
        assert_eq!(AudioMimeType::Mp4.extension(), "m4a");
    }

    #[test]
    fn mime_type_from_path() {
        assert_eq!(
            AudioMimeType::from_path(Path::new("/tmp/segment_001.MP3")),
            Some(AudioMimeType::Mp3)
        );
        assert_eq!(
            AudioMimeType::from_path(Path::new("talk.opus")),
            Some(AudioMimeType::Ogg)
        );
        assert_eq!(AudioMimeType::from_path(Path::new("notes.txt")), None);
        assert_eq!(AudioMimeType::from_path(Path::new("noext")), None);
    }

    #[test]
    fn human_readable_sizes() {
        assert_eq!(human_readable_bytes(500), "500 B");
        assert_eq!(human_readable_bytes(2048), "2.0 KB");
        assert_eq!(human_readable_bytes(25 * 1024 * 1024), "25.0 MB");
    }

    #[test]
    fn file_name_uses_extension() {
        let data = AudioData::new(vec![0u8; 4], AudioMimeType::Wav);
        assert_eq!(data.file_name(), "audio.wav");
        assert_eq!(data.size_bytes(), 4);
    }

    #[test]
    fn to_base64_decodes_back() {
        let data = AudioData::new(vec![1, 2, 3, 4], AudioMimeType::Mp3);
        use base64::Engine;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(data.to_base64())
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3, 4]);
    }
}
