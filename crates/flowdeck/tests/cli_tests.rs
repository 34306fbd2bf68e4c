//! End-to-end tests that drive the compiled `flowdeck` binary.

use serde_json::Value;
use tempfile::TempDir;

mod common;
use common::{run_flowdeck_in_dir, run_flowdeck_json};

fn initialized_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    let output = run_flowdeck_in_dir(temp.path(), &["init", "--quiet"]);
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    temp
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("id field").to_string()
}

#[test]
fn test_init_creates_workspace() {
    let temp = TempDir::new().unwrap();
    let output = run_flowdeck_in_dir(temp.path(), &["init"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initialized flowdeck"));
    assert!(temp.path().join(".flowdeck/config.yaml").is_file());
    assert!(temp.path().join(".flowdeck/store.jsonl").is_file());
}

#[test]
fn test_init_twice_fails() {
    let temp = initialized_dir();
    let output = run_flowdeck_in_dir(temp.path(), &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already initialized"), "stderr: {stderr}");
}

#[test]
fn test_commands_require_workspace() {
    let temp = TempDir::new().unwrap();
    let output = run_flowdeck_in_dir(temp.path(), &["project", "list"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not a flowdeck workspace"), "stderr: {stderr}");
}

#[test]
fn test_project_and_issue_lifecycle() {
    let temp = initialized_dir();
    let dir = temp.path();

    let project = run_flowdeck_json(dir, &["project", "create", "CodingFlow"]);
    assert_eq!(project["name"], "CodingFlow");
    let project_id = id_of(&project);

    let first = run_flowdeck_json(
        dir,
        &["issue", "create", "Login page", "-P", &project_id, "-l", "bug"],
    );
    assert_eq!(first["issue_number"], 1);
    assert_eq!(first["status"], "backlog");
    assert_eq!(first["labels"].as_array().map(Vec::len), Some(1));

    let second = run_flowdeck_json(
        dir,
        &["issue", "create", "Signup page", "-P", &project_id, "-s", "done"],
    );
    assert_eq!(second["issue_number"], 2);

    let done = run_flowdeck_json(dir, &["issue", "list", "-s", "done"]);
    let titles: Vec<&str> = done
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Signup page"]);

    let first_id = id_of(&first);
    let prefix = &first_id[..8];
    let moved = run_flowdeck_json(dir, &["issue", "status", prefix, "in-progress"]);
    assert_eq!(moved["status"], "in_progress");

    let details = run_flowdeck_json(dir, &["issue", "show", prefix]);
    assert_eq!(details["issue"]["title"], "Login page");
    assert_eq!(details["labels"][0]["name"], "Bug");

    let shown = run_flowdeck_json(dir, &["project", "show", &project_id]);
    assert_eq!(shown["stats"]["total"], 2);
    assert_eq!(shown["stats"]["completed"], 1);
}

#[test]
fn test_text_output_lists_issue_reference() {
    let temp = initialized_dir();
    let dir = temp.path();

    run_flowdeck_json(dir, &["issue", "create", "Loose end"]);

    let output = run_flowdeck_in_dir(dir, &["issue", "list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loose end"), "stdout: {stdout}");
}

#[test]
fn test_unknown_issue_reports_error() {
    let temp = initialized_dir();
    let output = run_flowdeck_in_dir(temp.path(), &["issue", "show", "abcd1234"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn test_ai_tracking_round_trip() {
    let temp = initialized_dir();
    let dir = temp.path();

    let issue = run_flowdeck_json(dir, &["issue", "create", "Generated"]);
    let issue_id = id_of(&issue);

    run_flowdeck_json(
        dir,
        &["ai", "track", "cursor", "-t", "300", "-i", &issue_id, "-s", "scaffold"],
    );
    run_flowdeck_json(dir, &["ai", "snapshot", "60", "-i", &issue_id, "--pending", "docs"]);

    let events = run_flowdeck_json(dir, &["ai", "events"]);
    assert_eq!(events.as_array().map(Vec::len), Some(1));
    assert_eq!(events[0]["tokens_used"], 300);

    let snapshots = run_flowdeck_json(dir, &["ai", "snapshot", "--list", "-i", &issue_id]);
    assert_eq!(snapshots[0]["pending_items"][0], "docs");

    let shown = run_flowdeck_json(dir, &["issue", "show", &issue_id]);
    assert_eq!(shown["issue"]["is_ai_generated"], true);
    assert_eq!(shown["issue"]["ai_context_tokens"], 300);
}
