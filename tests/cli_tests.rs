//! CLI integration tests for the voltconsole binary
//!
//! These tests run the compiled binary and check its output.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command instance for the voltconsole binary
#[allow(deprecated)]
fn voltconsole_cmd() -> Command {
    let mut cmd = Command::cargo_bin("voltconsole").expect("Failed to find voltconsole binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

// ============================================================================
// --help / --version
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    voltconsole_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("reasons"));
}

#[test]
fn test_version_flag() {
    voltconsole_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ============================================================================
// classify
// ============================================================================

#[test]
fn test_classify_bad_request_text() {
    voltconsole_cmd()
        .args(["classify", "--status", "400"])
        .args(["--message", "Missing field x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reason:      BAD_REQUEST"))
        .stdout(predicate::str::contains("message_key: errors.bad_request"))
        .stdout(predicate::str::contains("status:      400"))
        .stdout(predicate::str::contains("hint:        show_message"));
}

#[test]
fn test_classify_json_output() {
    let output = voltconsole_cmd()
        .args(["classify", "--status", "500"])
        .args(["--code", "ECONNRESET", "--format", "json"])
        .output()
        .expect("Failed to run voltconsole");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["reason"], "NETWORK");
    assert_eq!(value["message_key"], "errors.network");
    assert_eq!(value["http_status"], 500);
    assert_eq!(value["hint"], "retry");
}

#[test]
fn test_classify_plain_message() {
    voltconsole_cmd()
        .args(["classify", "-m", "Request timed out while waiting"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TIMEOUT"))
        .stdout(predicate::str::contains("status:      -"));
}

#[test]
fn test_classify_nothing_is_unknown() {
    voltconsole_cmd()
        .arg("classify")
        .assert()
        .success()
        .stdout(predicate::str::contains("UNKNOWN"))
        .stdout(predicate::str::contains("errors.generic"));
}

#[test]
fn test_classify_json_input() {
    voltconsole_cmd()
        .args(["classify", "--json-input", r#"{"foo": 1}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("UNKNOWN"));
}

#[test]
fn test_classify_invalid_json_input() {
    voltconsole_cmd()
        .args(["classify", "--json-input", "{not json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --json-input"));
}

#[test]
fn test_classify_offline() {
    voltconsole_cmd()
        .args(["classify", "--offline", "-m", "validation failed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NETWORK"));
}

#[test]
fn test_classify_with_rules_file() {
    let dir = tempfile::tempdir().unwrap();
    let rules = dir.path().join("rules.toml");
    std::fs::write(&rules, "[status_overrides]\n\"404\" = \"CONFLICT\"\n").unwrap();

    voltconsole_cmd()
        .args(["classify", "--status", "404", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("CONFLICT"));
}

#[test]
fn test_classify_missing_rules_file() {
    voltconsole_cmd()
        .args(["classify", "--status", "404"])
        .args(["--rules", "/nonexistent/rules.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("rules file not found"));
}

// ============================================================================
// reasons
// ============================================================================

#[test]
fn test_reasons_lists_all() {
    let assert = voltconsole_cmd().arg("reasons").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert_eq!(stdout.lines().count(), 11);
    assert!(stdout.contains("INVALID_CREDENTIALS"));
    assert!(stdout.contains("errors.generic"));
    assert!(stdout.contains("reauthenticate"));
}
