// crates/access-gate-cli/tests/commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: End-to-end tests for check, rollout, snapshot, and config.
// Purpose: Ensure the binary prints JSON decisions and fails closed on bad input.
// Dependencies: access-gate-cli binary
// ============================================================================
//! ## Overview
//! Runs the built `access-gate` binary against temporary snapshot, request,
//! and config files.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

const TENANT: &str = "tenant-1";
const USER: &str = "user-1";

fn access_gate_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_access-gate"))
}

fn snapshot_json() -> Value {
    json!({
        "permissions": [
            {"key": "voting.vote.cast", "service": "voting"},
            {"key": "voting.poll.create", "service": "voting"}
        ],
        "roles": [{
            "id": "role-voter",
            "tenant_id": TENANT,
            "service": "voting",
            "name": "voter",
            "is_system_template": false
        }],
        "role_permissions": [{"role_id": "role-voter", "permission": "voting.vote.cast"}],
        "bindings": [{
            "tenant_id": TENANT,
            "user_id": USER,
            "scope_type": "TENANT",
            "scope_id": TENANT,
            "role_id": "role-voter"
        }],
        "feature_flags": [{
            "id": "f-1",
            "key": "new_ballot_ui",
            "tenant_id": null,
            "enabled": true,
            "target_type": "all",
            "target_value": {}
        }],
        "kill_switches": [{"feature_key": "new_ballot_ui", "tenant_id": TENANT, "active": true}]
    })
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(access_gate_bin())
        .current_dir(dir.path())
        .env_remove("ACCESS_GATE_CONFIG")
        .args(args)
        .output()
        .expect("run access-gate")
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 path")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout json")
}

fn access_request(action: &str) -> String {
    json!({
        "tenant_id": TENANT,
        "user_id": USER,
        "action": action,
        "scope": {"type": "TENANT", "id": TENANT}
    })
    .to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn check_prints_access_response() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write(&dir, "snapshot.json", &snapshot_json().to_string());
    let request = write(&dir, "request.json", &access_request("voting.vote.cast"));
    let config = write(&dir, "access-gate.toml", "[audit]\nsink = \"none\"\n");

    let output = run(
        &dir,
        &["check", "--snapshot", arg(&snapshot), "--request", arg(&request), "--config", arg(&config)],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let value = stdout_json(&output);
    assert_eq!(value["allowed"], json!(true));
    assert_eq!(value["reason_code"], json!("RBAC_ALLOW"));
    assert_eq!(value["effective_permissions"], Value::Null);
}

#[test]
fn check_denial_still_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write(&dir, "snapshot.json", &snapshot_json().to_string());
    let request = write(&dir, "request.json", &access_request("voting.poll.create"));

    let output = run(&dir, &["check", "--snapshot", arg(&snapshot), "--request", arg(&request)]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["reason_code"], json!("RBAC_DENY"));
}

#[test]
fn check_writes_system_admin_audit_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write(&dir, "snapshot.json", &snapshot_json().to_string());
    let mut request: Value = serde_json::from_str(&access_request("voting.poll.create")).unwrap();
    request["master_flags"] = json!({"system_admin": true});
    let request = write(&dir, "request.json", &request.to_string());
    let log = dir.path().join("audit.jsonl");
    let config = write(
        &dir,
        "access-gate.toml",
        &format!("[audit]\nsink = \"file\"\npath = \"{}\"\n", arg(&log)),
    );

    let output = run(
        &dir,
        &["check", "--snapshot", arg(&snapshot), "--request", arg(&request), "--config", arg(&config)],
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["reason_code"], json!("MASTER_SYSTEM_ADMIN"));

    let contents = fs::read_to_string(&log).unwrap();
    let event: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(event["kind"], json!("system_admin_bypass"));
    assert_eq!(event["permission"], json!("voting.poll.create"));
}

#[test]
fn rollout_prints_flags_and_experiments() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write(&dir, "snapshot.json", &snapshot_json().to_string());
    let request =
        write(&dir, "request.json", &json!({"tenant_id": TENANT, "user_id": USER}).to_string());

    let output = run(&dir, &["rollout", "--snapshot", arg(&snapshot), "--request", arg(&request)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        json!({"experiments": {}, "feature_flags": {"new_ballot_ui": false}})
    );
}

#[test]
fn snapshot_path_can_come_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir, "snapshot.json", &snapshot_json().to_string());
    write(&dir, "access-gate.toml", "[audit]\nsink = \"none\"\n\n[snapshot]\npath = \"snapshot.json\"\n");

    let output = run(&dir, &["snapshot", "validate"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Snapshot valid"));
}

#[test]
fn snapshot_validate_rejects_dangling_binding() {
    let dir = tempfile::tempdir().unwrap();
    let mut snapshot = snapshot_json();
    snapshot["bindings"][0]["role_id"] = json!("role-ghost");
    let snapshot = write(&dir, "snapshot.json", &snapshot.to_string());

    let output = run(&dir, &["snapshot", "validate", "--snapshot", arg(&snapshot)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown role role-ghost"));
}

#[test]
fn missing_snapshot_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let request = write(&dir, "request.json", &access_request("voting.vote.cast"));
    let output = run(&dir, &["check", "--request", arg(&request)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No snapshot given"));
}

#[test]
fn oversized_snapshot_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = write(&dir, "snapshot.json", &snapshot_json().to_string());
    write(&dir, "access-gate.toml", "[audit]\nsink = \"none\"\n\n[snapshot]\nmax_bytes = 16\n");
    let output = run(&dir, &["snapshot", "validate", "--snapshot", arg(&snapshot)]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Refusing to read snapshot"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = tempfile::tempdir().unwrap();
    let good = write(&dir, "good.toml", "[audit]\nsink = \"stderr\"\n");
    let bad = write(&dir, "bad.toml", "[audit]\nsink = \"file\"\n");

    let ok = run(&dir, &["config", "validate", "--config", arg(&good)]);
    assert!(ok.status.success());
    assert_eq!(String::from_utf8_lossy(&ok.stdout).trim(), "Config valid.");

    let failed = run(&dir, &["config", "validate", "--config", arg(&bad)]);
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stderr).contains("file audit sink requires audit.path"));
}

#[test]
fn config_example_round_trips_through_validate() {
    let dir = tempfile::tempdir().unwrap();
    let example = run(&dir, &["config", "example"]);
    assert!(example.status.success());
    let path = write(&dir, "example.toml", &String::from_utf8_lossy(&example.stdout));

    let output = run(&dir, &["config", "validate", "--config", arg(&path)]);
    assert!(output.status.success());
}
