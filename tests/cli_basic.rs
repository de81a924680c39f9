//! Integration tests for basic CLI behavior.
//!
//! Tests that the binary exists, accepts standard flags, and that the
//! offline pipeline runs end to end against a snapshot file.

#![allow(deprecated)] // cargo_bin deprecation — replacement not yet stable

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: get a Command for the `replypulse` binary.
fn replypulse() -> Command {
    Command::cargo_bin("replypulse").expect("binary 'replypulse' should be built")
}

/// Unique temp path for one test.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("replypulse-cli-{}-{name}", std::process::id()))
}

// ─── Top-level flags ─────────────────────────────────────────────────────────

#[test]
fn help_flag_shows_usage() {
    replypulse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: replypulse"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn version_flag_shows_semver() {
    replypulse()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^replypulse \d+\.\d+\.\d+\n$").unwrap());
}

#[test]
fn no_args_shows_error_and_usage() {
    replypulse()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage: replypulse"));
}

#[test]
fn invalid_subcommand_fails() {
    replypulse()
        .arg("this-is-not-a-real-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn run_help_lists_flags() {
    replypulse()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--offline"))
        .stdout(predicate::str::contains("--snapshot"))
        .stdout(predicate::str::contains("--format"));
}

// ─── Offline pipeline ────────────────────────────────────────────────────────

#[test]
fn offline_run_renders_report_from_snapshot() {
    let snapshot = temp_path("offline-data.json");
    let report = temp_path("offline-report.txt");
    std::fs::write(
        &snapshot,
        r#"{"tweets": [{"username": "alice", "tweet": "hello", "replies": ["great!", "terrible"]}]}"#,
    )
    .unwrap();

    replypulse()
        .args([
            "run",
            "--offline",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--out",
            report.to_str().unwrap(),
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summarized 1 post(s)"));

    let content = std::fs::read_to_string(&report).unwrap();
    assert!(content.contains("Reply Sentiment Report"));
    assert!(content.contains("alice: hello"));

    let _ = std::fs::remove_file(&snapshot);
    let _ = std::fs::remove_file(&report);
}

#[test]
fn offline_run_without_snapshot_exits_nonzero() {
    let snapshot = temp_path("missing-data.json");
    let report = temp_path("missing-report.txt");

    replypulse()
        .args([
            "run",
            "--offline",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--out",
            report.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("snapshot"));

    assert!(!report.exists());
}

#[test]
fn unknown_report_format_is_rejected() {
    replypulse()
        .args(["run", "--offline", "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown report format"));
}

#[test]
fn offline_run_ignores_invalid_instance_url() {
    let config = temp_path("bad-instance-config.toml");
    let snapshot = temp_path("bad-instance-data.json");
    let report = temp_path("bad-instance-report.txt");
    std::fs::write(&config, "instance = \"not a url\"\n").unwrap();
    std::fs::write(
        &snapshot,
        r#"{"tweets": [{"username": "alice", "tweet": "hello", "replies": ["ok"]}]}"#,
    )
    .unwrap();

    replypulse()
        .args([
            "run",
            "--offline",
            "--config",
            config.to_str().unwrap(),
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--out",
            report.to_str().unwrap(),
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summarized 1 post(s)"));

    let _ = std::fs::remove_file(&config);
    let _ = std::fs::remove_file(&snapshot);
    let _ = std::fs::remove_file(&report);
}

#[test]
fn missing_explicit_config_is_an_error() {
    replypulse()
        .args(["run", "--offline", "--config", "/nonexistent/config.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
