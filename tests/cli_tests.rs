//! CLI integration tests

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn segment_scribe_bin(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_segment-scribe"));
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
fn help_output() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("transcribe"));
    assert!(stdout.contains("retry"));
    assert!(stdout.contains("discard"));
    assert!(stdout.contains("config"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn transcribe_help_lists_options() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .args(["transcribe", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--provider"));
    assert!(stdout.contains("--max-segment-mb"));
    assert!(stdout.contains("--output"));
    assert!(stdout.contains("--work-dir"));
    assert!(stdout.contains("assemblyai"));
}

#[test]
fn version_output() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segment-scribe"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("segment-scribe"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_provider_error() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .args(["transcribe", "talk.mp4", "--provider", "whisperx"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("whisperx"),
        "Expected error about invalid provider, got: {}",
        stderr
    );
}

#[test]
fn invalid_only_list_error() {
    let home = TempDir::new().unwrap();
    let output = segment_scribe_bin(home.path())
        .args(["retry", "session.json", "--only", "two"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_set_then_get_round_trip() {
    let home = TempDir::new().unwrap();

    let set = segment_scribe_bin(home.path())
        .args(["config", "set", "max_segment_mb", "12"])
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let get = segment_scribe_bin(home.path())
        .args(["config", "get", "max_segment_mb"])
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "12");
}

#[test]
fn config_list_masks_api_keys() {
    let home = TempDir::new().unwrap();

    let set = segment_scribe_bin(home.path())
        .args(["config", "set", "groq_api_key", "gsk_supersecretvalue1234"])
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let list = segment_scribe_bin(home.path())
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");
    assert!(list.status.success());

    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("gsk_...1234"));
    assert!(!stdout.contains("supersecret"));
    assert!(stdout.contains("(not set)"));
}
