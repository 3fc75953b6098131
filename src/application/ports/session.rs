//! Session storage port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::transcript::TranscriptionSession;

/// Session persistence errors
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Session file not found: {0}")]
    NotFound(String),

    #[error("Failed to read session file: {0}")]
    ReadError(String),

    #[error("Failed to parse session file: {0}")]
    ParseError(String),

    #[error("Failed to write session file: {0}")]
    WriteError(String),
}

/// Port for persisting retry state between invocations
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, path: &Path) -> Result<TranscriptionSession, SessionError>;

    async fn save(&self, path: &Path, session: &TranscriptionSession) -> Result<(), SessionError>;

    /// Delete a session file. Missing files are not an error.
    async fn remove(&self, path: &Path) -> Result<(), SessionError>;
}
