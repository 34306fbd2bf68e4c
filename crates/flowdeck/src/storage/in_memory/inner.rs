//! Core in-memory storage data structures.

use super::hierarchy::Hierarchy;
use super::table::Table;
use crate::domain::{
    AiTrackingEvent, Comment, ContextSnapshot, Cycle, Dataset, Issue, IssueLabel, Project,
};
use crate::error::Result;
use crate::storage::StorageOptions;

/// Inner storage structure (not thread-safe).
///
/// Wrapped in `Arc<Mutex<>>` by [`super::InMemoryStorage`]. Every table
/// keeps insertion order; `hierarchy` mirrors the `parent` field of every
/// issue and must contain a node for each row of `issues`.
pub(crate) struct InMemoryStorageInner {
    pub(super) projects: Table<Project>,
    pub(super) labels: Table<IssueLabel>,
    pub(super) issues: Table<Issue>,
    pub(super) comments: Table<Comment>,
    pub(super) cycles: Table<Cycle>,
    pub(super) ai_events: Table<AiTrackingEvent>,
    pub(super) snapshots: Table<ContextSnapshot>,
    pub(super) hierarchy: Hierarchy,
    pub(super) options: StorageOptions,
}

impl InMemoryStorageInner {
    /// Create an empty store.
    pub(crate) fn new(options: StorageOptions) -> Self {
        Self {
            projects: Table::default(),
            labels: Table::default(),
            issues: Table::default(),
            comments: Table::default(),
            cycles: Table::default(),
            ai_events: Table::default(),
            snapshots: Table::default(),
            hierarchy: Hierarchy::default(),
            options,
        }
    }

    /// Copy every table out, in insertion order.
    pub(crate) fn export(&self) -> Dataset {
        Dataset {
            projects: self.projects.to_vec(),
            labels: self.labels.to_vec(),
            issues: self.issues.to_vec(),
            comments: self.comments.to_vec(),
            cycles: self.cycles.to_vec(),
            ai_events: self.ai_events.to_vec(),
            snapshots: self.snapshots.to_vec(),
        }
    }

    /// Build a store from a dataset whose references are already consistent.
    ///
    /// Fails with `DuplicateKey` if any table repeats an id.
    pub(crate) fn from_dataset(data: Dataset, options: StorageOptions) -> Result<Self> {
        let issues = Table::from_rows(data.issues)?;
        let (hierarchy, _) = Hierarchy::rebuild(issues.iter().map(|i| (i.id, i.parent)));

        Ok(Self {
            projects: Table::from_rows(data.projects)?,
            labels: Table::from_rows(data.labels)?,
            issues,
            comments: Table::from_rows(data.comments)?,
            cycles: Table::from_rows(data.cycles)?,
            ai_events: Table::from_rows(data.ai_events)?,
            snapshots: Table::from_rows(data.snapshots)?,
            hierarchy,
            options,
        })
    }
}
