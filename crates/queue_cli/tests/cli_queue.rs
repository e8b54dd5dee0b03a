use std::path::Path;
use std::process::{Command, Output};

fn run_todo(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_todo"))
        .args(args)
        .env("TODO_STORE_PATH", dir.join("tasks.json"))
        .env("TODO_CONFIG_PATH", dir.join("config.json"))
        .env_remove("TODO_DEBUG")
        .output()
        .expect("failed to run todo")
}

#[test]
fn queue_orders_by_priority_with_waits() {
    let dir = tempfile::tempdir().unwrap();
    run_todo(dir.path(), &["add", "medium", "-p", "3", "-d", "30"]);
    run_todo(dir.path(), &["add", "urgent", "-p", "1", "-d", "30"]);
    run_todo(dir.path(), &["add", "soonish", "-p", "2", "-d", "30"]);

    let output = run_todo(dir.path(), &["--json", "queue"]);
    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();

    assert_eq!(summary["pending"], 3);
    assert_eq!(summary["total_estimated_minutes"], 90);
    let queue = summary["queue"].as_array().unwrap();
    let order: Vec<&str> = queue
        .iter()
        .map(|entry| entry["description"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec!["urgent", "soonish", "medium"]);
    let waits: Vec<u64> = queue
        .iter()
        .map(|entry| entry["wait_minutes"].as_u64().unwrap())
        .collect();
    assert_eq!(waits, vec![0, 30, 60]);
}

#[test]
fn queue_equal_priority_is_first_come_first_served() {
    let dir = tempfile::tempdir().unwrap();
    run_todo(dir.path(), &["add", "one"]);
    run_todo(dir.path(), &["add", "two"]);
    run_todo(dir.path(), &["add", "three"]);

    let output = run_todo(dir.path(), &["--json", "queue"]);
    let summary: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    let ids: Vec<u64> = summary["queue"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn queue_plain_summary() {
    let dir = tempfile::tempdir().unwrap();
    run_todo(dir.path(), &["add", "big job", "-d", "1500"]);
    run_todo(dir.path(), &["add", "after", "-d", "45"]);
    run_todo(dir.path(), &["add", "busy"]);
    run_todo(dir.path(), &["start", "3"]);

    let output = run_todo(dir.path(), &["queue"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Queue Status Summary:"));
    assert!(stdout.contains("- Pending tasks: 2"));
    assert!(stdout.contains("- In progress tasks: 1"));
    assert!(stdout.contains("- Completed tasks: 0"));
    assert!(stdout.contains("- Total estimated wait time: 1 days, 1 hours, 45 minutes"));
    assert!(stdout.contains("Current Queue:"));
    assert!(stdout.contains("1 days, 1 hours"));
    assert!(!stdout.contains("waitTime"));
}

#[test]
fn queue_on_empty_store_skips_listing() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_todo(dir.path(), &["queue"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("- Pending tasks: 0"));
    assert!(stdout.contains("- Total estimated wait time: 0 minutes"));
    assert!(!stdout.contains("Current Queue:"));
}
