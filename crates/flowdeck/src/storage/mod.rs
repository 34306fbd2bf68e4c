//! Storage abstraction layer for flowdeck.
//!
//! [`TrackerStorage`] is the single interface the presentation layer talks
//! to. It is an object-safe async trait so callers hold a
//! `Box<dyn TrackerStorage>` regardless of backend:
//!
//! - **In-memory**: tables in RAM, lost on exit
//! - **JSONL**: the in-memory store loaded from and saved to one JSONL file
//!
//! # Example
//!
//! ```no_run
//! use flowdeck::domain::{NewIssue, NewProject};
//! use flowdeck::storage::{StorageBackend, StorageOptions, create_storage};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage =
//!         create_storage(StorageBackend::InMemory, StorageOptions::default()).await?;
//!
//!     let project = storage.create_project(NewProject::named("CodingFlow")).await?;
//!     let issue = storage
//!         .create_issue(NewIssue::titled("Add login").in_project(project.id))
//!         .await?;
//!     println!("Created {} {}", issue.reference(), issue.title);
//!
//!     Ok(())
//! }
//! ```

use crate::domain::{
    AiTrackingEvent, Comment, CommentId, ContextSnapshot, Cycle, CycleId, CycleUpdate, Dataset,
    Issue, IssueId, IssueLabel, IssueStatus, IssueUpdate, LabelId, NewAiEvent, NewComment,
    NewContextSnapshot, NewCycle, NewIssue, NewLabel, NewProject, Project, ProjectId,
    ProjectUpdate,
};
use crate::error::Result;
use crate::query::IssueQuery;
use crate::stats::{AiStats, CycleStats, ProjectStats};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod in_memory;

/// Default number of AI events returned by [`TrackerStorage::ai_events`]
pub const DEFAULT_AI_EVENT_LIMIT: usize = 50;

/// Core storage trait for project and issue tracking.
///
/// Implementations must be `Send + Sync` for use in async contexts.
///
/// # Method Categories
///
/// - **Projects & labels**: `create_project` .. `remove_label_from_issue`
/// - **Issues & comments**: `create_issue` .. `delete_comment`
/// - **Cycles**: `create_cycle` .. `cycle_issues`
/// - **Statistics**: `cycle_stats`, `project_stats`, `ai_stats`
/// - **AI tracking**: `track_ai_event` .. `context_snapshots`
/// - **Batch**: `import_all`, `export_all`
/// - **Persistence**: `save`, `reload`
///
/// # Error Handling
///
/// - `Error::NotFound` when any referenced entity is missing
/// - `Error::Validation` for rejected input; nothing is modified
/// - `Error::DuplicateKey` when an id is already taken
/// - `Error::Persistence` when the backing file cannot be read or written
///
/// A failed call never leaves a partial change behind.
#[async_trait]
pub trait TrackerStorage: Send + Sync {
    // ========== Projects ==========

    /// Create a project. Seeds the default labels unless disabled in
    /// [`StorageOptions`].
    async fn create_project(&mut self, project: NewProject) -> Result<Project>;

    /// Get a project by id.
    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>>;

    /// Update a project and refresh its `updated_at`.
    async fn update_project(&mut self, id: &ProjectId, updates: ProjectUpdate) -> Result<Project>;

    /// Delete a project with its issues (and their subtasks and comments)
    /// and labels. Cycles of the project are kept with the project cleared.
    async fn delete_project(&mut self, id: &ProjectId) -> Result<DeleteSummary>;

    /// Projects by `updated_at` descending, optionally filtered by a
    /// case-insensitive search over name and description.
    async fn list_projects(&self, search: Option<&str>) -> Result<Vec<Project>>;

    // ========== Labels ==========

    /// Create a label.
    async fn create_label(&mut self, label: NewLabel) -> Result<IssueLabel>;

    /// Labels of `project`, or all labels for `None`.
    async fn list_labels(&self, project: Option<&ProjectId>) -> Result<Vec<IssueLabel>>;

    /// Delete a label and detach it from every issue.
    async fn delete_label(&mut self, id: &LabelId) -> Result<()>;

    /// Attach a label. Attaching twice is a no-op.
    async fn add_label_to_issue(&mut self, issue: &IssueId, label: &LabelId) -> Result<Issue>;

    /// Detach a label. Detaching an absent label is a no-op.
    async fn remove_label_from_issue(&mut self, issue: &IssueId, label: &LabelId)
    -> Result<Issue>;

    // ========== Issues ==========

    /// Create an issue, assigning the next number in its project.
    async fn create_issue(&mut self, issue: NewIssue) -> Result<Issue>;

    /// Get an issue by id.
    async fn get_issue(&self, id: &IssueId) -> Result<Option<Issue>>;

    /// Update an issue. Moving it to another project re-numbers it there.
    async fn update_issue(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue>;

    /// Set the status and refresh `updated_at`.
    async fn change_status(&mut self, id: &IssueId, status: IssueStatus) -> Result<Issue>;

    /// Delete an issue with its subtasks and comments.
    async fn delete_issue(&mut self, id: &IssueId) -> Result<DeleteSummary>;

    /// Delete several issues as one atomic operation.
    async fn delete_issues(&mut self, ids: &[IssueId]) -> Result<DeleteSummary>;

    /// Direct subtasks of an issue.
    async fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>>;

    /// Set or clear the parent of an issue.
    ///
    /// # Errors
    ///
    /// `Error::Validation` if the issue would become its own ancestor.
    async fn set_parent(&mut self, id: &IssueId, parent: Option<&IssueId>) -> Result<Issue>;

    /// The number the next issue in `project` would get.
    async fn next_issue_number(&self, project: Option<&ProjectId>) -> Result<u32>;

    /// Filter and sort issues.
    async fn fetch_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>>;

    /// Issues created at or after `since`, newest first.
    async fn issues_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Issue>>;

    /// Number of issues with `status`, optionally within one project.
    async fn status_count(&self, status: IssueStatus, project: Option<&ProjectId>)
    -> Result<usize>;

    // ========== Comments ==========

    /// Add a comment to an issue.
    async fn add_comment(&mut self, comment: NewComment) -> Result<Comment>;

    /// Comments on an issue, oldest first.
    async fn list_comments(&self, issue: &IssueId) -> Result<Vec<Comment>>;

    /// Delete one comment.
    async fn delete_comment(&mut self, id: &CommentId) -> Result<()>;

    // ========== Cycles ==========

    /// Create a cycle.
    async fn create_cycle(&mut self, cycle: NewCycle) -> Result<Cycle>;

    /// Get a cycle by id.
    async fn get_cycle(&self, id: &CycleId) -> Result<Option<Cycle>>;

    /// Update a cycle.
    async fn update_cycle(&mut self, id: &CycleId, updates: CycleUpdate) -> Result<Cycle>;

    /// Delete a cycle; its issues lose the cycle reference.
    async fn delete_cycle(&mut self, id: &CycleId) -> Result<()>;

    /// Archive a cycle and release its issues.
    async fn archive_cycle(&mut self, id: &CycleId) -> Result<Cycle>;

    /// Plan an issue into a cycle. Archived cycles are rejected with
    /// `ValidationError::ArchivedCycle`.
    async fn assign_issue_to_cycle(&mut self, issue: &IssueId, cycle: &CycleId) -> Result<Issue>;

    /// Take an issue out of its cycle.
    async fn remove_issue_from_cycle(&mut self, issue: &IssueId) -> Result<Issue>;

    /// Non-archived cycles by start date descending.
    async fn list_cycles(&self, project: Option<&ProjectId>) -> Result<Vec<Cycle>>;

    /// Non-archived cycles containing `now`.
    async fn active_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>>;

    /// Non-archived cycles starting after `now`.
    async fn upcoming_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>>;

    /// Issues planned into a cycle.
    async fn cycle_issues(&self, id: &CycleId) -> Result<Vec<Issue>>;

    // ========== Statistics ==========

    /// Progress of one cycle.
    async fn cycle_stats(&self, id: &CycleId) -> Result<CycleStats>;

    /// Issue counts of one project.
    async fn project_stats(&self, id: &ProjectId) -> Result<ProjectStats>;

    /// Today's AI activity as of `now`.
    async fn ai_stats(&self, now: DateTime<Utc>) -> Result<AiStats>;

    // ========== AI Tracking ==========

    /// Record an AI interaction and update the related issue's AI metadata.
    async fn track_ai_event(&mut self, event: NewAiEvent) -> Result<AiTrackingEvent>;

    /// Events newest first, optionally for one issue.
    async fn ai_events(&self, issue: Option<&IssueId>, limit: usize)
    -> Result<Vec<AiTrackingEvent>>;

    /// Save a progress checkpoint.
    async fn save_context_snapshot(
        &mut self,
        snapshot: NewContextSnapshot,
    ) -> Result<ContextSnapshot>;

    /// Snapshots of an issue, newest first.
    async fn context_snapshots(&self, issue: &IssueId) -> Result<Vec<ContextSnapshot>>;

    // ========== Batch Operations ==========

    /// Replace the whole store with `data`.
    ///
    /// The dataset is checked first (unique ids per table, every reference
    /// resolvable, no parent loops, unique numbers per project); on any
    /// problem the current contents are kept.
    async fn import_all(&mut self, data: Dataset) -> Result<()>;

    /// Every table in full.
    async fn export_all(&self) -> Result<Dataset>;

    // ========== Persistence ==========

    /// Write the store to its backing file. No-op for in-memory storage.
    ///
    /// Takes `&self` so callers can persist after read-only work.
    async fn save(&self) -> Result<()>;

    /// Discard in-memory changes and re-read the backing file.
    ///
    /// Used after a failed [`save`](Self::save) so memory matches disk again.
    /// No-op for in-memory storage.
    async fn reload(&mut self) -> Result<()>;
}

/// What a delete removed or detached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Projects removed
    pub projects: usize,

    /// Issues removed, subtasks included
    pub issues: usize,

    /// Comments removed
    pub comments: usize,

    /// Labels removed
    pub labels: usize,

    /// Cycles kept but detached from the project
    pub detached_cycles: usize,

    /// AI events and snapshots that lost their issue reference
    pub detached_records: usize,
}

/// Behaviour switches shared by all backends
#[derive(Debug, Clone, Copy)]
pub struct StorageOptions {
    /// Seed the default labels into every new project
    pub seed_default_labels: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            seed_default_labels: true,
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// The data file for file-based backends.
    #[must_use]
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Adds JSONL file persistence to an in-memory store.
struct JsonlBackedStorage {
    inner: Box<dyn TrackerStorage>,
    path: PathBuf,
    options: StorageOptions,
}

impl JsonlBackedStorage {
    async fn open(path: PathBuf, options: StorageOptions) -> Result<Self> {
        let (inner, warnings) = in_memory::load_from_jsonl(&path, options).await?;
        for warning in &warnings {
            tracing::warn!(%warning, path = %path.display(), "Store load warning");
        }
        Ok(Self {
            inner,
            path,
            options,
        })
    }
}

#[async_trait]
impl TrackerStorage for JsonlBackedStorage {
    async fn create_project(&mut self, project: NewProject) -> Result<Project> {
        self.inner.create_project(project).await
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>> {
        self.inner.get_project(id).await
    }

    async fn update_project(&mut self, id: &ProjectId, updates: ProjectUpdate) -> Result<Project> {
        self.inner.update_project(id, updates).await
    }

    async fn delete_project(&mut self, id: &ProjectId) -> Result<DeleteSummary> {
        self.inner.delete_project(id).await
    }

    async fn list_projects(&self, search: Option<&str>) -> Result<Vec<Project>> {
        self.inner.list_projects(search).await
    }

    async fn create_label(&mut self, label: NewLabel) -> Result<IssueLabel> {
        self.inner.create_label(label).await
    }

    async fn list_labels(&self, project: Option<&ProjectId>) -> Result<Vec<IssueLabel>> {
        self.inner.list_labels(project).await
    }

    async fn delete_label(&mut self, id: &LabelId) -> Result<()> {
        self.inner.delete_label(id).await
    }

    async fn add_label_to_issue(&mut self, issue: &IssueId, label: &LabelId) -> Result<Issue> {
        self.inner.add_label_to_issue(issue, label).await
    }

    async fn remove_label_from_issue(
        &mut self,
        issue: &IssueId,
        label: &LabelId,
    ) -> Result<Issue> {
        self.inner.remove_label_from_issue(issue, label).await
    }

    async fn create_issue(&mut self, issue: NewIssue) -> Result<Issue> {
        self.inner.create_issue(issue).await
    }

    async fn get_issue(&self, id: &IssueId) -> Result<Option<Issue>> {
        self.inner.get_issue(id).await
    }

    async fn update_issue(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue> {
        self.inner.update_issue(id, updates).await
    }

    async fn change_status(&mut self, id: &IssueId, status: IssueStatus) -> Result<Issue> {
        self.inner.change_status(id, status).await
    }

    async fn delete_issue(&mut self, id: &IssueId) -> Result<DeleteSummary> {
        self.inner.delete_issue(id).await
    }

    async fn delete_issues(&mut self, ids: &[IssueId]) -> Result<DeleteSummary> {
        self.inner.delete_issues(ids).await
    }

    async fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>> {
        self.inner.subtasks(id).await
    }

    async fn set_parent(&mut self, id: &IssueId, parent: Option<&IssueId>) -> Result<Issue> {
        self.inner.set_parent(id, parent).await
    }

    async fn next_issue_number(&self, project: Option<&ProjectId>) -> Result<u32> {
        self.inner.next_issue_number(project).await
    }

    async fn fetch_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>> {
        self.inner.fetch_issues(query).await
    }

    async fn issues_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Issue>> {
        self.inner.issues_created_since(since).await
    }

    async fn status_count(
        &self,
        status: IssueStatus,
        project: Option<&ProjectId>,
    ) -> Result<usize> {
        self.inner.status_count(status, project).await
    }

    async fn add_comment(&mut self, comment: NewComment) -> Result<Comment> {
        self.inner.add_comment(comment).await
    }

    async fn list_comments(&self, issue: &IssueId) -> Result<Vec<Comment>> {
        self.inner.list_comments(issue).await
    }

    async fn delete_comment(&mut self, id: &CommentId) -> Result<()> {
        self.inner.delete_comment(id).await
    }

    async fn create_cycle(&mut self, cycle: NewCycle) -> Result<Cycle> {
        self.inner.create_cycle(cycle).await
    }

    async fn get_cycle(&self, id: &CycleId) -> Result<Option<Cycle>> {
        self.inner.get_cycle(id).await
    }

    async fn update_cycle(&mut self, id: &CycleId, updates: CycleUpdate) -> Result<Cycle> {
        self.inner.update_cycle(id, updates).await
    }

    async fn delete_cycle(&mut self, id: &CycleId) -> Result<()> {
        self.inner.delete_cycle(id).await
    }

    async fn archive_cycle(&mut self, id: &CycleId) -> Result<Cycle> {
        self.inner.archive_cycle(id).await
    }

    async fn assign_issue_to_cycle(&mut self, issue: &IssueId, cycle: &CycleId) -> Result<Issue> {
        self.inner.assign_issue_to_cycle(issue, cycle).await
    }

    async fn remove_issue_from_cycle(&mut self, issue: &IssueId) -> Result<Issue> {
        self.inner.remove_issue_from_cycle(issue).await
    }

    async fn list_cycles(&self, project: Option<&ProjectId>) -> Result<Vec<Cycle>> {
        self.inner.list_cycles(project).await
    }

    async fn active_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>> {
        self.inner.active_cycles(now).await
    }

    async fn upcoming_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>> {
        self.inner.upcoming_cycles(now).await
    }

    async fn cycle_issues(&self, id: &CycleId) -> Result<Vec<Issue>> {
        self.inner.cycle_issues(id).await
    }

    async fn cycle_stats(&self, id: &CycleId) -> Result<CycleStats> {
        self.inner.cycle_stats(id).await
    }

    async fn project_stats(&self, id: &ProjectId) -> Result<ProjectStats> {
        self.inner.project_stats(id).await
    }

    async fn ai_stats(&self, now: DateTime<Utc>) -> Result<AiStats> {
        self.inner.ai_stats(now).await
    }

    async fn track_ai_event(&mut self, event: NewAiEvent) -> Result<AiTrackingEvent> {
        self.inner.track_ai_event(event).await
    }

    async fn ai_events(
        &self,
        issue: Option<&IssueId>,
        limit: usize,
    ) -> Result<Vec<AiTrackingEvent>> {
        self.inner.ai_events(issue, limit).await
    }

    async fn save_context_snapshot(
        &mut self,
        snapshot: NewContextSnapshot,
    ) -> Result<ContextSnapshot> {
        self.inner.save_context_snapshot(snapshot).await
    }

    async fn context_snapshots(&self, issue: &IssueId) -> Result<Vec<ContextSnapshot>> {
        self.inner.context_snapshots(issue).await
    }

    async fn import_all(&mut self, data: Dataset) -> Result<()> {
        self.inner.import_all(data).await
    }

    async fn export_all(&self) -> Result<Dataset> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        let data = self.inner.export_all().await?;
        in_memory::save_to_jsonl(&data, &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        let (inner, warnings) = in_memory::load_from_jsonl(&self.path, self.options).await?;
        for warning in &warnings {
            tracing::warn!(%warning, "Store reload warning");
        }
        self.inner = inner;
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// A JSONL backend whose file does not exist yet starts empty; the file is
/// created on the first [`save`](TrackerStorage::save).
///
/// # Errors
///
/// `Error::Persistence` if an existing JSONL file cannot be read.
pub async fn create_storage(
    backend: StorageBackend,
    options: StorageOptions,
) -> Result<Box<dyn TrackerStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage(options)),
        StorageBackend::Jsonl(path) => {
            Ok(Box::new(JsonlBackedStorage::open(path, options).await?))
        }
    }
}
