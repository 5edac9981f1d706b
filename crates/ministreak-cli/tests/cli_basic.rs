//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ministreak"));
    cmd.env("MINISTREAK_DATA_DIR", data_dir).env_remove("RUST_LOG");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = cli(data_dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> (serde_json::Value, String) {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    let json = serde_json::from_str(&stdout).expect("Failed to parse JSON output");
    (json, stderr)
}

fn has_event(report: &serde_json::Value, kind: &str) -> bool {
    report["events"]
        .as_array()
        .map(|events| events.iter().any(|e| e["type"] == kind))
        .unwrap_or(false)
}

#[test]
fn test_status_on_fresh_profile() {
    let dir = tempfile::tempdir().unwrap();
    let (report, _) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "status"]);

    assert!(has_event(&report, "DaySeeded"));
    assert_eq!(report["status"]["current_streak"], 0);
    assert_eq!(report["status"]["freeze_count"], 1);
    assert_eq!(report["status"]["last_seen"], "2025-04-01");
    assert_eq!(report["status"]["sub_task_a"]["label"], "Birdhouse run");
}

#[test]
fn test_mark_both_sub_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let (first, stderr) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "a"]);
    assert!(has_event(&first, "Halfway"));
    assert!(stderr.contains("notify: Halfway done (1/2)!"));
    assert_eq!(first["status"]["current_streak"], 0);

    let (second, stderr) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "b"]);
    assert!(has_event(&second, "DayCompleted"));
    assert!(stderr.contains("Your current streak is 1 day!"));
    assert_eq!(second["status"]["current_streak"], 1);
    assert_eq!(second["status"]["completed_today"], true);

    let (again, _) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "b"]);
    assert!(!has_event(&again, "DayCompleted"));
    assert_eq!(again["status"]["current_streak"], 1);
}

#[test]
fn test_missed_day_spends_freeze_then_resets() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "a"]);
    run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "b"]);

    let (frozen, stderr) = run_json(dir.path(), &["--today", "2025-04-03", "streak", "tick"]);
    let rolled = frozen["events"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["type"] == "DayRolledOver")
        .expect("expected a rollover event");
    assert_eq!(rolled["verdict"], "frozen");
    assert_eq!(frozen["status"]["current_streak"], 1);
    assert_eq!(frozen["status"]["freeze_count"], 0);
    assert!(stderr.contains("keep up your streak"));

    let (reset, _) = run_json(dir.path(), &["--today", "2025-04-05", "streak", "tick"]);
    assert_eq!(reset["status"]["current_streak"], 0);
    assert_eq!(reset["status"]["best_streak"], 1);
}

#[test]
fn test_resume_reminds_once_per_day() {
    let dir = tempfile::tempdir().unwrap();
    let (_, first) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "resume"]);
    let (_, second) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "resume"]);

    assert!(first.contains("notify: Complete today's mini tasks to start a streak."));
    assert!(!second.contains("notify:"));
}

#[test]
fn test_message_detection() {
    let dir = tempfile::tempdir().unwrap();
    let (report, _) = run_json(
        dir.path(),
        &[
            "--today",
            "2025-04-01",
            "streak",
            "message",
            "<col=ef1020>You plant a Ranarr seed in the herb patch.</col>",
        ],
    );
    assert!(has_event(&report, "MessageMatched"));
    assert_eq!(report["status"]["sub_task_b"]["done_today"], true);

    let (ignored, _) = run_json(
        dir.path(),
        &["--today", "2025-04-01", "streak", "message", "You catch a rabbit."],
    );
    assert!(!has_event(&ignored, "MessageMatched"));
}

#[test]
fn test_decorate_uses_streak() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "a"]);
    run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "b"]);

    let (stdout, _, code) = run_cli(
        dir.path(),
        &["--today", "2025-04-01", "streak", "decorate", "Zezima"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "<col=ffd700>1</col> Zezima");
}

#[test]
fn test_force_roll() {
    let dir = tempfile::tempdir().unwrap();
    run_json(dir.path(), &["--today", "2025-04-01", "streak", "mark", "a"]);
    let (report, _) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "force-roll"]);

    assert!(has_event(&report, "DayRolledOver"));
    assert_eq!(report["status"]["sub_task_a"]["last_done"], "");
    assert_eq!(report["status"]["last_seen"], "2025-04-01");
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "tick.interval_ms"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "600");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "streak.initial_freeze_count", "0"]);
    assert_eq!(code, 0);

    let (report, _) = run_json(dir.path(), &["--today", "2025-04-01", "streak", "status"]);
    assert_eq!(report["status"]["freeze_count"], 0);

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope.nothing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_show_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "display.streak_color", "00ff00"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "display.streak_color = 00ff00");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "show", "display"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "streak_color = \"00ff00\"");

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "display.streak_color"]);
    assert_eq!(stdout.trim(), "ffd700");
}

#[test]
fn test_rust_log_raises_verbosity() {
    let dir = tempfile::tempdir().unwrap();
    let quiet = cli(dir.path())
        .args(["--today", "2025-04-01", "streak", "status"])
        .output()
        .unwrap();
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("record hydrated"));

    let verbose = cli(dir.path())
        .env("RUST_LOG", "debug")
        .args(["--today", "2025-04-01", "streak", "status"])
        .output()
        .unwrap();
    assert!(verbose.status.success());
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("record hydrated"));
}

#[test]
fn test_watch_consumes_stdin_messages() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = cli(dir.path())
        .args([
            "--today",
            "2025-04-01",
            "streak",
            "watch",
            "--ticks",
            "4",
            "--interval-ms",
            "250",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn watch");

    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(
            stdin,
            "Your birdhouse trap is now full of seed and will start to catch birds."
        )
        .unwrap();
    }

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(events.iter().any(|e| e["type"] == "SubTaskMarked" && e["task"] == "a"));
}
