//! JSON file session store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{SessionError, SessionStore};
use crate::domain::transcript::TranscriptionSession;

/// File name used for a run's session inside its work directory
pub const SESSION_FILE_NAME: &str = "session.json";

/// Stores sessions as pretty-printed JSON files
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSessionStore;

impl JsonSessionStore {
    pub fn new() -> Self {
        Self
    }

    /// Session file location for a work directory
    pub fn path_in(work_dir: &Path) -> PathBuf {
        work_dir.join(SESSION_FILE_NAME)
    }
}

#[async_trait]
impl SessionStore for JsonSessionStore {
    async fn load(&self, path: &Path) -> Result<TranscriptionSession, SessionError> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SessionError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(SessionError::ReadError(e.to_string())),
        };

        serde_json::from_str(&content).map_err(|e| SessionError::ParseError(e.to_string()))
    }

    async fn save(&self, path: &Path, session: &TranscriptionSession) -> Result<(), SessionError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::WriteError(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::WriteError(e.to_string()))?;

        // Write then rename so a crash never leaves a truncated session
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| SessionError::WriteError(e.to_string()))?;
        fs::rename(&tmp, path)
            .await
            .map_err(|e| SessionError::WriteError(e.to_string()))?;

        tracing::debug!(path = %path.display(), failures = session.failures.len(), "Session saved");
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), SessionError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::WriteError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::ProviderId;
    use crate::domain::segmentation::Segment;
    use crate::domain::transcript::{BatchStatus, SegmentFailure};
    use tempfile::TempDir;

    fn session(dir: &Path) -> TranscriptionSession {
        TranscriptionSession {
            source: PathBuf::from("/videos/lecture.mkv"),
            provider: ProviderId::AssemblyAi,
            created_at_ms: 1_760_000_000_000,
            segments: vec![
                Segment::new(0, dir.join("segment_001.mp3"), 0.0, 900.0),
                Segment::new(1, dir.join("segment_002.mp3"), 900.0, 900.0),
            ],
            failures: vec![SegmentFailure::provider(1, "HTTP 502: bad gateway", 3)],
            text: "first part\n[❌ ERROR: segment 2 failed - HTTP 502: bad gateway]".to_string(),
            status: BatchStatus::Partial,
        }
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonSessionStore::new();
        let path = JsonSessionStore::path_in(dir.path());
        let original = session(dir.path());

        store.save(&path, &original).await.unwrap();
        let loaded = store.load(&path).await.unwrap();

        assert_eq!(loaded, original);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn saved_file_is_readable_json() {
        let dir = TempDir::new().unwrap();
        let store = JsonSessionStore::new();
        let path = JsonSessionStore::path_in(dir.path());

        store.save(&path, &session(dir.path())).await.unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(value["provider"], "assemblyai");
        assert_eq!(value["status"], "partial");
        assert_eq!(value["failures"][0]["kind"], "provider");
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = JsonSessionStore::new()
            .load(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }

    #[tokio::test]
    async fn load_corrupt_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonSessionStore::new().load(&path).await.unwrap_err();
        assert!(matches!(err, SessionError::ParseError(_)));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = JsonSessionStore::new();
        let path = JsonSessionStore::path_in(dir.path());

        store.save(&path, &session(dir.path())).await.unwrap();
        store.remove(&path).await.unwrap();
        assert!(!path.exists());
        store.remove(&path).await.unwrap();
    }
}
