//! Error scenario integration tests

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn segment_scribe_bin(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("segment-scribe").expect("binary should build");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env_remove("GROQ_API_KEY")
        .env_remove("ASSEMBLYAI_API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("SEGMENT_SCRIBE_PROVIDER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn missing_api_key_error() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["transcribe", "talk.mp4", "--provider", "assemblyai"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ASSEMBLYAI_API_KEY"))
        .stderr(predicate::str::contains("assemblyai_api_key"));
}

#[test]
fn missing_input_file_error() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .env("GROQ_API_KEY", "gsk_test")
        .args(["transcribe"])
        .arg(home.path().join("does-not-exist.mp4"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn retry_missing_session_error() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .arg("retry")
        .arg(home.path().join("session.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Session file not found"));
}

#[test]
fn retry_segment_zero_is_usage_error() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["retry", "session.json", "--only", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("start at 1"));
}

#[test]
fn discard_corrupt_session_error() {
    let home = TempDir::new().unwrap();
    let session = home.path().join("session.json");
    std::fs::write(&session, "{ not json").unwrap();

    segment_scribe_bin(home.path())
        .arg("discard")
        .arg(&session)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parse"));

    assert!(session.exists());
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_invalid_provider() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["config", "set", "provider", "whisperx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid provider"));
}

#[test]
fn config_set_invalid_duration() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["config", "set", "backoff_base", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn config_set_zero_segment_size() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["config", "set", "max_segment_mb", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("positive integer"));
}

#[test]
fn config_init_twice_fails() {
    let home = TempDir::new().unwrap();

    segment_scribe_bin(home.path())
        .args(["config", "init"])
        .assert()
        .success();

    segment_scribe_bin(home.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}
