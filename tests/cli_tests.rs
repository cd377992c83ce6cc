//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;

fn streamscribe_bin() -> Command {
    Command::cargo_bin("streamscribe").expect("binary exists")
}

#[test]
fn help_output() {
    streamscribe_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dictation"))
        .stdout(predicate::str::contains("hotkey"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("--clipboard"))
        .stdout(predicate::str::contains("--notify"));
}

#[test]
fn version_output() {
    streamscribe_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamscribe"));
}

#[test]
fn config_path_command() {
    streamscribe_bin()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("streamscribe"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_get_unknown_key() {
    streamscribe_bin()
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    streamscribe_bin()
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_rejects_bad_temperature() {
    streamscribe_bin()
        .args(["config", "set", "temperature", "2.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn hotkey_without_daemon_fails() {
    let runtime_dir = tempfile::tempdir().unwrap();

    streamscribe_bin()
        .args(["hotkey", "status"])
        .env("XDG_RUNTIME_DIR", runtime_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No daemon running"));
}

#[test]
fn missing_api_key_fails_fast() {
    let config_dir = tempfile::tempdir().unwrap();
    let runtime_dir = tempfile::tempdir().unwrap();

    streamscribe_bin()
        .env_remove("WHISPER_API_KEY")
        .env("XDG_CONFIG_HOME", config_dir.path())
        .env("XDG_RUNTIME_DIR", runtime_dir.path())
        .env("HOME", config_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn rejects_out_of_range_temperature_flag() {
    streamscribe_bin()
        .args(["-t", "3.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}
