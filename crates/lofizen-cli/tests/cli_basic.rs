//! Basic CLI E2E tests.
//!
//! Invokes the binary via cargo against the dev data directory and
//! checks that read-side commands succeed.

use std::process::Command;

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "lofizen-cli", "--"])
        .args(args)
        .env("LOFIZEN_ENV", "dev")
        .output()
        .expect("failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn settings_show_prints_json() {
    let (stdout, _, code) = run_cli(&["settings", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("daily_goal_ms"));
}

#[test]
fn stats_show_prints_json() {
    let (stdout, _, code) = run_cli(&["stats", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("total_sessions"));
}

#[test]
fn todo_list_succeeds() {
    let (_, _, code) = run_cli(&["todo", "list"]);
    assert_eq!(code, 0);
}

#[test]
fn video_list_contains_defaults_or_custom() {
    let (stdout, _, code) = run_cli(&["video", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.trim_start().starts_with('['));
}
