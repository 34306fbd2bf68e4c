//! Domain types for project and issue tracking.
//!
//! Entities are plain data. Each has a `New*` input type whose `build`
//! validates field-level rules; references between entities are checked by
//! the storage layer.

mod comment;
mod cycle;
mod ids;
mod issue;
mod label;
mod project;
mod tracking;
pub(crate) mod validate;

pub use comment::{Comment, NewComment};
pub use cycle::{Cycle, CycleUpdate, DEFAULT_CYCLE_CAPACITY, NewCycle, SPRINT_CAPACITY};
pub use ids::{
    CommentId, CycleId, EntityKind, EventId, IssueId, LabelId, MIN_ID_PREFIX_LEN, ProjectId,
    SnapshotId, resolve_prefix,
};
pub use issue::{Issue, IssuePriority, IssueStatus, IssueType, IssueUpdate, NewIssue};
pub use label::{DEFAULT_LABEL_COLOR, DEFAULT_LABEL_ICON, DEFAULT_LABELS, IssueLabel, NewLabel};
pub use project::{DEFAULT_PROJECT_COLOR, DEFAULT_PROJECT_ICON, NewProject, Project, ProjectUpdate};
pub use tracking::{AiTool, AiTrackingEvent, ContextSnapshot, NewAiEvent, NewContextSnapshot};

use serde::{Deserialize, Serialize};

/// Every table of the store, as handed to export collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// All projects
    pub projects: Vec<Project>,

    /// All labels
    pub labels: Vec<IssueLabel>,

    /// All issues
    pub issues: Vec<Issue>,

    /// All comments
    pub comments: Vec<Comment>,

    /// All cycles, archived included
    pub cycles: Vec<Cycle>,

    /// All AI tracking events
    pub ai_events: Vec<AiTrackingEvent>,

    /// All context snapshots
    pub snapshots: Vec<ContextSnapshot>,
}

impl Dataset {
    /// Total number of records across all tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
            + self.labels.len()
            + self.issues.len()
            + self.comments.len()
            + self.cycles.len()
            + self.ai_events.len()
            + self.snapshots.len()
    }

    /// Whether every table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
