//! JSONL persistence for in-memory storage.
//!
//! The whole store lives in one file with one tagged record per line:
//!
//! ```text
//! {"kind":"project","id":"…","name":"CodingFlow",…}
//! {"kind":"issue","id":"…","issue_number":1,"title":"Add login",…}
//! ```
//!
//! Saving rewrites the file through a temp file and a single rename, so a
//! crash mid-save leaves the previous contents intact.

use super::inner::InMemoryStorageInner;
use super::integrity::reconcile;
use crate::domain::{
    AiTrackingEvent, Comment, ContextSnapshot, Cycle, Dataset, EntityKind, Issue, IssueId,
    IssueLabel, Project, ProjectId,
};
use crate::error::Result;
use crate::storage::{StorageOptions, TrackerStorage};
use flowdeck_jsonl::{Warning as JsonlWarning, read_jsonl_resilient, write_jsonl_atomic};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One line of the store file.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Project(Project),
    Label(IssueLabel),
    Cycle(Cycle),
    Issue(Issue),
    Comment(Comment),
    AiEvent(AiTrackingEvent),
    Snapshot(ContextSnapshot),
}

/// Borrowing twin of [`Record`] used when writing.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RecordRef<'a> {
    Project(&'a Project),
    Label(&'a IssueLabel),
    Cycle(&'a Cycle),
    Issue(&'a Issue),
    Comment(&'a Comment),
    AiEvent(&'a AiTrackingEvent),
    Snapshot(&'a ContextSnapshot),
}

impl Dataset {
    fn from_records(records: Vec<Record>) -> Self {
        let mut data = Self::default();
        for record in records {
            match record {
                Record::Project(p) => data.projects.push(p),
                Record::Label(l) => data.labels.push(l),
                Record::Cycle(c) => data.cycles.push(c),
                Record::Issue(i) => data.issues.push(i),
                Record::Comment(c) => data.comments.push(c),
                Record::AiEvent(e) => data.ai_events.push(e),
                Record::Snapshot(s) => data.snapshots.push(s),
            }
        }
        data
    }

    /// Records in dependency order: owners before the rows that reference them.
    fn records(&self) -> Vec<RecordRef<'_>> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.projects.iter().map(RecordRef::Project));
        out.extend(self.labels.iter().map(RecordRef::Label));
        out.extend(self.cycles.iter().map(RecordRef::Cycle));
        out.extend(self.issues.iter().map(RecordRef::Issue));
        out.extend(self.comments.iter().map(RecordRef::Comment));
        out.extend(self.ai_events.iter().map(RecordRef::AiEvent));
        out.extend(self.snapshots.iter().map(RecordRef::Snapshot));
        out
    }
}

/// Non-fatal problems found while loading a store file.
///
/// The load still succeeds; the offending data is skipped or repaired as
/// described on each variant.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    /// Line could not be parsed; it was skipped
    MalformedJson {
        /// 1-based line number
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A second record reused an id; the later one was dropped
    DuplicateRecord {
        /// Table
        kind: EntityKind,
        /// Repeated id
        id: String,
    },

    /// A reference pointed at a missing entity; it was cleared (or, for a
    /// comment, the comment was dropped)
    DanglingReference {
        /// Kind of the referring record
        kind: EntityKind,
        /// Id of the referring record
        id: String,
        /// Field holding the reference
        field: &'static str,
        /// Kind of the missing entity
        target_kind: EntityKind,
        /// Missing id
        target: String,
    },

    /// Parent link would close a loop; it was cleared
    HierarchyCycle {
        /// Issue whose parent was cleared
        issue: IssueId,
        /// The rejected parent
        parent: IssueId,
    },

    /// Issue number clashed within its project and was reassigned
    RenumberedIssue {
        /// Renumbered issue
        issue: IssueId,
        /// Its project
        project: ProjectId,
        /// Number found in the file
        from: u32,
        /// Number assigned
        to: u32,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedJson { line_number, error } => {
                write!(f, "skipped malformed line {line_number}: {error}")
            }
            Self::DuplicateRecord { kind, id } => write!(f, "dropped duplicate {kind} {id}"),
            Self::DanglingReference {
                kind,
                id,
                field,
                target_kind,
                target,
            } => write!(f, "{kind} {id}: {field} points at missing {target_kind} {target}"),
            Self::HierarchyCycle { issue, parent } => {
                write!(f, "issue {issue}: parent {parent} would form a loop, cleared")
            }
            Self::RenumberedIssue { issue, from, to, .. } => {
                write!(f, "issue {issue}: number {from} already taken, now {to}")
            }
        }
    }
}

/// Load a store from a JSONL file.
///
/// A missing file yields an empty store. Malformed lines and inconsistent
/// references are skipped or repaired and reported as [`LoadWarning`]s.
///
/// # Errors
///
/// Returns `Error::Persistence` if the file exists but cannot be read.
pub async fn load_from_jsonl(
    path: &Path,
    options: StorageOptions,
) -> Result<(Box<dyn TrackerStorage>, Vec<LoadWarning>)> {
    if !tokio::fs::try_exists(path).await? {
        tracing::debug!(path = %path.display(), "Store file missing, starting empty");
        return Ok((
            Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new(options)))),
            Vec::new(),
        ));
    }

    let (records, jsonl_warnings) = read_jsonl_resilient::<Record, _>(path).await?;

    let mut warnings: Vec<LoadWarning> = jsonl_warnings
        .into_iter()
        .map(|warning| match warning {
            JsonlWarning::MalformedJson { line_number, error } => {
                LoadWarning::MalformedJson { line_number, error }
            }
            JsonlWarning::SkippedLine {
                line_number,
                reason,
            } => LoadWarning::MalformedJson {
                line_number,
                error: reason,
            },
        })
        .collect();

    let mut data = Dataset::from_records(records);
    warnings.extend(reconcile(&mut data, false)?);

    let inner = InMemoryStorageInner::from_dataset(data, options)?;
    tracing::debug!(
        path = %path.display(),
        issues = inner.issues.len(),
        warnings = warnings.len(),
        "Loaded store"
    );
    Ok((Box::new(Arc::new(Mutex::new(inner))), warnings))
}

/// Write every table of `data` to `path`, replacing it atomically.
///
/// # Errors
///
/// Returns `Error::Persistence` if writing or renaming fails. The previous
/// file is left untouched in that case.
pub async fn save_to_jsonl(data: &Dataset, path: &Path) -> Result<()> {
    let records = data.records();
    write_jsonl_atomic(path, &records).await?;
    tracing::debug!(path = %path.display(), records = records.len(), "Saved store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewIssue, NewProject};
    use chrono::Utc;

    #[test]
    fn records_carry_kind_tag() {
        let project = NewProject::named("P").build(Utc::now()).unwrap();
        let json = serde_json::to_string(&RecordRef::Project(&project)).unwrap();
        assert!(json.starts_with(r#"{"kind":"project","#));

        let parsed: Record = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, Record::Project(p) if p == project));
    }

    #[test]
    fn records_list_owners_first() {
        let project = NewProject::named("P").build(Utc::now()).unwrap();
        let issue = NewIssue::titled("I")
            .in_project(project.id)
            .build(1, Utc::now())
            .unwrap();
        let data = Dataset {
            issues: vec![issue],
            projects: vec![project],
            ..Default::default()
        };
        let kinds: Vec<_> = data
            .records()
            .iter()
            .map(|r| matches!(r, RecordRef::Project(_)))
            .collect();
        assert_eq!(kinds, [true, false]);
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("none.jsonl");
        let (storage, warnings) = load_from_jsonl(&path, StorageOptions::default())
            .await
            .unwrap();
        assert!(warnings.is_empty());
        assert!(storage.export_all().await.unwrap().is_empty());
    }
}
