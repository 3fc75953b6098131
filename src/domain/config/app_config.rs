//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::media::{AudioEncoding, Duration, DEFAULT_BITRATE_KBPS};
use crate::domain::provider::ProviderId;

/// Default number of attempts per segment
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub groq_api_key: Option<String>,
    pub assemblyai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    /// Segment size limit; the provider's upload ceiling when unset
    pub max_segment_mb: Option<u64>,
    pub bitrate_kbps: Option<u32>,
    pub max_attempts: Option<u32>,
    pub backoff_base: Option<String>,
    pub request_timeout: Option<String>,
    pub work_dir: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            provider: Some(ProviderId::default().to_string()),
            groq_api_key: None,
            assemblyai_api_key: None,
            gemini_api_key: None,
            max_segment_mb: None,
            bitrate_kbps: Some(DEFAULT_BITRATE_KBPS),
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            backoff_base: Some(Duration::default_backoff_base().to_string()),
            request_timeout: Some(Duration::default_request_timeout().to_string()),
            work_dir: None,
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            provider: other.provider.or(self.provider),
            groq_api_key: other.groq_api_key.or(self.groq_api_key),
            assemblyai_api_key: other.assemblyai_api_key.or(self.assemblyai_api_key),
            gemini_api_key: other.gemini_api_key.or(self.gemini_api_key),
            max_segment_mb: other.max_segment_mb.or(self.max_segment_mb),
            bitrate_kbps: other.bitrate_kbps.or(self.bitrate_kbps),
            max_attempts: other.max_attempts.or(self.max_attempts),
            backoff_base: other.backoff_base.or(self.backoff_base),
            request_timeout: other.request_timeout.or(self.request_timeout),
            work_dir: other.work_dir.or(self.work_dir),
        }
    }

    /// Get provider as parsed ProviderId, or default if not set/invalid
    pub fn provider_or_default(&self) -> ProviderId {
        self.provider
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// API key configured for a provider
    pub fn api_key_for(&self, provider: ProviderId) -> Option<&str> {
        let key = match provider {
            ProviderId::Groq => self.groq_api_key.as_deref(),
            ProviderId::AssemblyAi => self.assemblyai_api_key.as_deref(),
            ProviderId::Gemini => self.gemini_api_key.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    /// Segment size limit in bytes, capped at the provider ceiling
    pub fn max_segment_bytes(&self, provider_ceiling: u64) -> u64 {
        self.max_segment_mb
            .filter(|mb| *mb > 0)
            .map(|mb| mb.saturating_mul(1024 * 1024))
            .map_or(provider_ceiling, |bytes| bytes.min(provider_ceiling))
    }

    pub fn encoding_or_default(&self) -> AudioEncoding {
        AudioEncoding::mp3(
            self.bitrate_kbps
                .filter(|b| *b > 0)
                .unwrap_or(DEFAULT_BITRATE_KBPS),
        )
    }

    pub fn max_attempts_or_default(&self) -> u32 {
        self.max_attempts
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    /// Get backoff base as parsed Duration, or default if not set/invalid
    pub fn backoff_base_or_default(&self) -> Duration {
        self.backoff_base
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_backoff_base)
    }

    /// Get request timeout as parsed Duration, or default if not set/invalid
    pub fn request_timeout_or_default(&self) -> Duration {
        self.request_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_request_timeout)
    }

    pub fn work_dir(&self) -> Option<PathBuf> {
        self.work_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }
}
