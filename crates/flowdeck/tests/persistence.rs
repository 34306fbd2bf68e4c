//! Integration tests for the JSONL-backed store: round trips, lenient
//! loading of damaged files and strict imports.

use flowdeck::domain::{
    Dataset, EntityKind, IssueStatus, NewAiEvent, NewComment, NewContextSnapshot, NewCycle,
    NewIssue, NewProject, ProjectId,
};
use flowdeck::error::Error;
use flowdeck::storage::in_memory::{LoadWarning, load_from_jsonl, save_to_jsonl};
use flowdeck::storage::{StorageBackend, StorageOptions, TrackerStorage, create_storage};
use std::path::Path;
use tempfile::TempDir;

mod common;
use common::{fixed_time, new_issue};

async fn open(path: &Path) -> Box<dyn TrackerStorage> {
    create_storage(
        StorageBackend::Jsonl(path.to_path_buf()),
        StorageOptions::default(),
    )
    .await
    .unwrap()
}

async fn populate(storage: &mut dyn TrackerStorage) {
    let project = storage
        .create_project(NewProject::named("CodingFlow"))
        .await
        .unwrap();
    let epic = storage
        .create_issue(new_issue("Auth", project.id, IssueStatus::InProgress))
        .await
        .unwrap();
    let mut child = NewIssue::titled("OAuth callback").in_project(project.id);
    child.parent = Some(epic.id);
    child.estimated_hours = Some(2.5);
    let child = storage.create_issue(child).await.unwrap();

    storage
        .add_comment(NewComment {
            issue: child.id,
            content: "Needs PKCE".to_string(),
            is_ai_generated: true,
        })
        .await
        .unwrap();
    let cycle = storage
        .create_cycle(NewCycle::current_week(fixed_time()).in_project(Some(project.id)))
        .await
        .unwrap();
    storage.assign_issue_to_cycle(&child.id, &cycle.id).await.unwrap();
    storage
        .track_ai_event(NewAiEvent {
            event_type: "generation".to_string(),
            ai_tool: "claude_code".to_string(),
            prompt_summary: "callback handler".to_string(),
            files_changed: vec!["src/auth.rs".to_string()],
            tokens_used: 1200,
            issue: Some(child.id),
        })
        .await
        .unwrap();
    storage
        .save_context_snapshot(NewContextSnapshot {
            completion_percentage: 40.0,
            key_files: vec!["src/auth.rs".to_string()],
            pending_items: vec!["tests".to_string()],
            notes: "halfway".to_string(),
            issue: Some(child.id),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_save_and_reopen_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let mut storage = open(&path).await;
    populate(storage.as_mut()).await;
    storage.save().await.unwrap();
    let before = storage.export_all().await.unwrap();

    let reopened = open(&path).await;
    let after = reopened.export_all().await.unwrap();

    assert_eq!(after, before);
    assert_eq!(after.projects.len(), 1);
    assert_eq!(after.labels.len(), 5);
    assert_eq!(after.issues.len(), 2);
}

#[tokio::test]
async fn test_missing_file_starts_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.jsonl");

    let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
        .await
        .unwrap();

    assert!(warnings.is_empty());
    assert!(storage.export_all().await.unwrap().is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_reload_discards_unsaved_changes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let mut storage = open(&path).await;
    storage.create_project(NewProject::named("Saved")).await.unwrap();
    storage.save().await.unwrap();
    storage.create_project(NewProject::named("Unsaved")).await.unwrap();

    storage.reload().await.unwrap();

    let names: Vec<String> = storage
        .list_projects(None)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Saved"]);
}

#[tokio::test]
async fn test_malformed_lines_are_skipped_with_warning() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let project = NewProject::named("Kept").build(fixed_time()).unwrap();
    let data = Dataset {
        projects: vec![project.clone()],
        ..Dataset::default()
    };
    save_to_jsonl(&data, &path).await.unwrap();

    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("{\"kind\":\"issue\",\"title\":\n");
    content.push_str("not json at all\n");
    std::fs::write(&path, content).unwrap();

    let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
        .await
        .unwrap();

    let lines: Vec<usize> = warnings
        .iter()
        .filter_map(|w| match w {
            LoadWarning::MalformedJson { line_number, .. } => Some(*line_number),
            _ => None,
        })
        .collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(
        storage.get_project(&project.id).await.unwrap(),
        Some(project)
    );
}

fn orphaned_issue() -> Dataset {
    let issue = NewIssue::titled("Orphan")
        .in_project(ProjectId::new())
        .build(1, fixed_time())
        .unwrap();
    Dataset {
        issues: vec![issue],
        ..Dataset::default()
    }
}

#[tokio::test]
async fn test_dangling_reference_is_repaired_on_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");
    save_to_jsonl(&orphaned_issue(), &path).await.unwrap();

    let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
        .await
        .unwrap();

    assert!(matches!(
        warnings.as_slice(),
        [LoadWarning::DanglingReference {
            field: "project",
            target_kind: EntityKind::Project,
            ..
        }]
    ));
    let data = storage.export_all().await.unwrap();
    assert_eq!(data.issues[0].project, None);
}

#[tokio::test]
async fn test_strict_import_rejects_dangling_reference() {
    let mut storage = common::bare_storage().await;
    let err = storage.import_all(orphaned_issue()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::NotFound {
            kind: EntityKind::Project,
            ..
        }
    ));
    assert!(storage.export_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_issue_numbers_are_renumbered_on_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let project = NewProject::named("P").build(fixed_time()).unwrap();
    let issues = ["first", "clash"]
        .into_iter()
        .map(|title| {
            NewIssue::titled(title)
                .in_project(project.id)
                .build(1, fixed_time())
                .unwrap()
        })
        .collect();
    let data = Dataset {
        projects: vec![project],
        issues,
        ..Dataset::default()
    };
    save_to_jsonl(&data, &path).await.unwrap();

    let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
        .await
        .unwrap();

    assert!(matches!(
        warnings.as_slice(),
        [LoadWarning::RenumberedIssue { from: 1, to: 2, .. }]
    ));
    let numbers: Vec<u32> = storage
        .export_all()
        .await
        .unwrap()
        .issues
        .iter()
        .map(|i| i.issue_number)
        .collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_parent_loop_in_file_is_broken_on_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let mut a = NewIssue::titled("a").build(1, fixed_time()).unwrap();
    let mut b = NewIssue::titled("b").build(2, fixed_time()).unwrap();
    a.parent = Some(b.id);
    b.parent = Some(a.id);
    let data = Dataset {
        issues: vec![a, b],
        ..Dataset::default()
    };
    save_to_jsonl(&data, &path).await.unwrap();

    let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
        .await
        .unwrap();

    assert!(
        warnings
            .iter()
            .any(|w| matches!(w, LoadWarning::HierarchyCycle { .. }))
    );
    let loaded = storage.export_all().await.unwrap();
    assert!(loaded.issues.iter().any(|i| i.parent.is_none()));
}

#[tokio::test]
async fn test_save_replaces_file_contents() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.jsonl");

    let mut storage = open(&path).await;
    let project = storage.create_project(NewProject::named("Gone")).await.unwrap();
    storage.save().await.unwrap();
    storage.delete_project(&project.id).await.unwrap();
    storage.save().await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.trim().is_empty());
    assert!(!temp.path().join("store.jsonl.tmp").exists());
}
