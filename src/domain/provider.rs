//! ASR provider identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidProviderError;

/// Available speech-to-text providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Groq Whisper (OpenAI-compatible endpoint, strict upload ceiling)
    #[default]
    Groq,
    /// AssemblyAI (upload + async transcript, large files)
    AssemblyAi,
    /// Google Gemini (inline audio)
    Gemini,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [Self::Groq, Self::AssemblyAi, Self::Gemini];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::AssemblyAi => "assemblyai",
            Self::Gemini => "gemini",
        }
    }

    /// Environment variable holding this provider's API key
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::AssemblyAi => "ASSEMBLYAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Config file key holding this provider's API key
    pub const fn api_key_config_key(&self) -> &'static str {
        match self {
            Self::Groq => "groq_api_key",
            Self::AssemblyAi => "assemblyai_api_key",
            Self::Gemini => "gemini_api_key",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = InvalidProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "assemblyai" | "assembly" => Ok(Self::AssemblyAi),
            "gemini" => Ok(Self::Gemini),
            _ => Err(InvalidProviderError {
                input: s.to_string(),
            }),
        }
    }
}
