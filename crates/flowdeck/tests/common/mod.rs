//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use flowdeck::domain::{IssueStatus, NewIssue, ProjectId};
use flowdeck::storage::{StorageBackend, StorageOptions, TrackerStorage, create_storage};
use std::path::Path;
use std::process::{Command, Output};

/// In-memory storage with default labels seeded into new projects.
pub async fn memory_storage() -> Box<dyn TrackerStorage> {
    create_storage(StorageBackend::InMemory, StorageOptions::default())
        .await
        .expect("in-memory storage")
}

/// In-memory storage that creates projects without labels.
pub async fn bare_storage() -> Box<dyn TrackerStorage> {
    create_storage(
        StorageBackend::InMemory,
        StorageOptions {
            seed_default_labels: false,
        },
    )
    .await
    .expect("in-memory storage")
}

/// A fixed instant for building entities outside the store.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
}

/// New issue with a title, project and status.
pub fn new_issue(title: &str, project: ProjectId, status: IssueStatus) -> NewIssue {
    let mut issue = NewIssue::titled(title).in_project(project);
    issue.status = status;
    issue
}

/// Run the flowdeck binary in `dir` with colors disabled.
pub fn run_flowdeck_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flowdeck"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute flowdeck binary")
}

/// Run the binary with `--json` and parse stdout.
pub fn run_flowdeck_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_flowdeck_in_dir(dir, &full);
    assert!(
        output.status.success(),
        "flowdeck {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}
