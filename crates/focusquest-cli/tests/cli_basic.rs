//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify exit codes and outputs.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "focusquest-cli", "--"])
        .args(args)
        .env("FOCUSQUEST_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_timer_status() {
    let (_, _, code) = run_cli(&["timer", "status"]);
    assert_eq!(code, 0, "Timer status failed");
}

#[test]
fn test_timer_status_json() {
    let (stdout, _, code) = run_cli(&["timer", "status", "--json"]);
    assert_eq!(code, 0, "Timer status JSON failed");
    let parsed: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("status must be valid JSON");
    assert!(parsed.get("remaining_seconds").is_some());
}

#[test]
fn test_timer_reset() {
    let (_, _, code) = run_cli(&["timer", "reset"]);
    assert_eq!(code, 0, "Timer reset failed");
}

#[test]
fn test_task_add_and_list() {
    let (stdout, _, code) = run_cli(&["task", "add", "Test Task"]);
    assert_eq!(code, 0, "Task add failed");
    assert!(stdout.contains("Task created:"));

    let (stdout, _, code) = run_cli(&["task", "list"]);
    assert_eq!(code, 0, "Task list failed");
    assert!(stdout.contains("Test Task"));
}

#[test]
fn test_task_list_json() {
    let (stdout, _, code) = run_cli(&["task", "list", "--json"]);
    assert_eq!(code, 0, "Task list JSON failed");
    assert!(serde_json::from_str::<serde_json::Value>(stdout.trim()).is_ok());
}

#[test]
fn test_task_empty_title_is_rejected() {
    let (_, stderr, code) = run_cli(&["task", "add", "   "]);
    assert_ne!(code, 0, "empty task title must fail");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_quest_list() {
    let (stdout, _, code) = run_cli(&["quest", "list"]);
    assert_eq!(code, 0, "Quest list failed");
    assert!(stdout.contains("Daily"));
}

#[test]
fn test_stats_today() {
    let (_, _, code) = run_cli(&["stats", "today"]);
    assert_eq!(code, 0, "Stats today failed");
}

#[test]
fn test_stats_week() {
    let (_, _, code) = run_cli(&["stats", "week"]);
    assert_eq!(code, 0, "Stats week failed");
}

#[test]
fn test_profile_show() {
    let (_, _, code) = run_cli(&["profile", "show"]);
    assert_eq!(code, 0, "Profile show failed");
}

#[test]
fn test_insights() {
    let (_, _, code) = run_cli(&["insights"]);
    assert_eq!(code, 0, "Insights failed");
}

#[test]
fn test_leaderboard_global() {
    let (_, _, code) = run_cli(&["leaderboard", "global"]);
    assert_eq!(code, 0, "Leaderboard failed");
}

#[test]
fn test_config_get() {
    let (stdout, _, code) = run_cli(&["config", "get", "goal.daily_minutes"]);
    assert_eq!(code, 0, "Config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_set() {
    let (_, _, code) = run_cli(&["config", "set", "goal.daily_minutes", "75"]);
    assert_eq!(code, 0, "Config set failed");
}

#[test]
fn test_config_unknown_key_fails() {
    let (_, _, code) = run_cli(&["config", "get", "nope.nothing"]);
    assert_ne!(code, 0, "unknown config key must fail");
}

#[test]
fn test_club_create_and_list() {
    let (stdout, _, code) = run_cli(&["club", "create", "Test Club"]);
    assert_eq!(code, 0, "Club create failed");
    assert!(stdout.contains("Club created:"));

    let (stdout, _, code) = run_cli(&["club", "list"]);
    assert_eq!(code, 0, "Club list failed");
    assert!(stdout.contains("Test Club"));
}
