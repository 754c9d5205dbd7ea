//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. They run
//! against the dev data directory (CARELEDGER_ENV=dev).

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "careledger-cli", "--"])
        .args(args)
        .env("CARELEDGER_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_ledger_status() {
    let (code, stdout, _) = run_cli(&["ledger", "status"]);
    assert_eq!(code, 0, "ledger status failed");
    assert!(stdout.contains("points"));
}

#[test]
fn test_ledger_status_json() {
    let (code, stdout, _) = run_cli(&["ledger", "status", "--json"]);
    assert_eq!(code, 0, "ledger status --json failed");
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("status output is not JSON");
    assert!(parsed["total"].is_i64());
}

#[test]
fn test_goal_add_toggle_delete_roundtrip() {
    let (code, stdout, _) = run_cli(&["goal", "add", "cli test goal"]);
    assert_eq!(code, 0, "goal add failed");
    assert!(stdout.contains("Goal created:"));

    let (code, stdout, _) = run_cli(&["goal", "list", "--json"]);
    assert_eq!(code, 0, "goal list failed");
    let goals: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    let goal = goals
        .as_array()
        .and_then(|a| a.iter().find(|g| g["text"] == "cli test goal"))
        .expect("created goal not listed");
    let id = goal["id"].as_str().unwrap().to_string();

    let (code, stdout, _) = run_cli(&["goal", "toggle", &id]);
    assert_eq!(code, 0, "goal toggle failed");
    assert!(stdout.contains("GoalCompleted"));

    let (code, stdout, _) = run_cli(&["goal", "delete", &id]);
    assert_eq!(code, 0, "goal delete failed");
    assert!(stdout.contains("GoalDeleted"));
}

#[test]
fn test_goal_scan() {
    let (code, stdout, _) = run_cli(&["goal", "scan"]);
    assert_eq!(code, 0, "goal scan failed");
    assert!(stdout.contains("Scan resolved"));
}

#[test]
fn test_toggle_unknown_goal_fails() {
    let (code, _, stderr) = run_cli(&["goal", "toggle", "no-such-id"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no goal"));
}

#[test]
fn test_config_show() {
    let (code, stdout, _) = run_cli(&["config", "show", "--json"]);
    assert_eq!(code, 0, "config show failed");
    let parsed: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(parsed["resolution"]["window_hours"], 24);
}

#[test]
fn test_doctor_scope_accepted() {
    let (code, _, _) = run_cli(&["ledger", "status", "--scope", "doctor"]);
    assert_eq!(code, 0, "doctor scope failed");
}

#[test]
fn test_unknown_scope_rejected() {
    let (code, _, stderr) = run_cli(&["ledger", "status", "--scope", "nurse"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown scope"));
}
