//! CLI integration tests for the failsafe binary
//!
//! These tests verify that the CLI commands work correctly by running
//! the actual compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command instance for the failsafe binary
#[allow(deprecated)]
fn failsafe_cmd() -> Command {
    let mut cmd = Command::cargo_bin("failsafe").expect("Failed to find failsafe binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// classify
// ============================================================================

#[test]
fn test_classify_message() {
    failsafe_cmd()
        .args(["classify", "Request failed: rate limit exceeded"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "RATE_LIMIT rate_limit retryable=true fallback=true",
        ));
}

#[test]
fn test_classify_unmatched_message_is_custom() {
    failsafe_cmd()
        .args(["classify", "some completely novel phrase"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CUSTOM_ERROR unknown"));
}

#[test]
fn test_classify_structured_error() {
    failsafe_cmd()
        .args(["classify", "some completely novel phrase", "--name", "Error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UNKNOWN_ERROR unknown"));
}

#[test]
fn test_classify_status() {
    failsafe_cmd()
        .args(["classify", "upstream said no", "--status", "503"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SERVICE_UNAVAILABLE system"));
}

#[test]
fn test_classify_json() {
    failsafe_cmd()
        .args(["classify", "ECONNREFUSED", "--name", "Error", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"code\": \"CONNECTION_ERROR\""))
        .stdout(predicate::str::contains("\"classification\": \"network\""))
        .stdout(predicate::str::contains("\"shouldFallback\": true"));
}

// ============================================================================
// code
// ============================================================================

#[test]
fn test_code_lookup() {
    failsafe_cmd()
        .args(["code", "INTERNAL_ERROR"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "INTERNAL_ERROR system retryable=true fallback=false",
        ));
}

#[test]
fn test_code_unknown() {
    failsafe_cmd()
        .args(["code", "NOT_A_CODE"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown error code: NOT_A_CODE"));
}

#[test]
fn test_code_with_config_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("failsafe.toml");
    std::fs::write(
        &path,
        "retryable_errors = [\"AUTHENTICATION_ERROR\"]\nfallback_on_errors = []\n",
    )
    .expect("Failed to write config");

    failsafe_cmd()
        .args(["code", "AUTHENTICATION_ERROR", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "AUTHENTICATION_ERROR authentication retryable=true fallback=false",
        ));
}

#[test]
fn test_missing_config_file_fails() {
    failsafe_cmd()
        .args(["code", "TIMEOUT", "--config", "/nonexistent/failsafe.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("FileNotFound"));
}

// ============================================================================
// table
// ============================================================================

#[test]
fn test_table_lists_every_code() {
    let assert = failsafe_cmd().arg("table").assert().success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();

    assert!(output.starts_with("CODE"));
    assert_eq!(output.lines().count(), 21);
    assert!(output.contains("INVALID_API_KEY"));
    assert!(output.contains("CUSTOM_ERROR"));
}

#[test]
fn test_help() {
    failsafe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Classify provider errors into retry and fallback decisions",
        ));
}
