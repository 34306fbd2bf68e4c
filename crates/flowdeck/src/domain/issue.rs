//! Issues and their enumerations.

use super::ids::{CycleId, IssueId, LabelId, ProjectId};
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of an issue, in canonical display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    /// Not yet planned
    #[default]
    Backlog,

    /// Planned, not started
    Todo,

    /// Being worked on
    InProgress,

    /// Awaiting review
    InReview,

    /// Finished
    Done,
}

impl IssueStatus {
    /// Every status in canonical order
    pub const ALL: [IssueStatus; 5] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Done,
    ];

    /// Stable wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Done => "done",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Done => "Done",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority; lower rank is more urgent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuePriority {
    /// Rank 0
    Urgent,

    /// Rank 1
    High,

    /// Rank 2
    #[default]
    Medium,

    /// Rank 3
    Low,
}

impl IssuePriority {
    /// Every priority from most to least urgent
    pub const ALL: [IssuePriority; 4] = [Self::Urgent, Self::High, Self::Medium, Self::Low];

    /// Numeric rank: urgent 0 through low 3
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Stable wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for IssuePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work an issue represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueType {
    /// Large body of work
    Epic,

    /// User-facing feature
    Story,

    /// General task
    #[default]
    Task,

    /// Defect
    Bug,

    /// Child of another issue
    Subtask,
}

impl IssueType {
    /// Stable wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Story => "story",
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Subtask => "subtask",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work tracked within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier
    pub id: IssueId,

    /// Position within the project, assigned at creation
    pub issue_number: u32,

    /// Issue title
    pub title: String,

    /// Issue description
    #[serde(default)]
    pub description: String,

    /// Workflow status
    pub status: IssueStatus,

    /// Priority
    pub priority: IssuePriority,

    /// Issue type
    pub issue_type: IssueType,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation of the issue
    pub updated_at: DateTime<Utc>,

    /// Estimate in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    /// Hours spent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,

    /// Whether an AI tool produced or touched this issue
    #[serde(default)]
    pub is_ai_generated: bool,

    /// Last AI tool recorded against the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_tool_used: Option<String>,

    /// Number of AI interactions recorded
    #[serde(default)]
    pub ai_generation_count: u32,

    /// Cumulative tokens across AI interactions
    #[serde(default)]
    pub ai_context_tokens: u64,

    /// Owning project
    #[serde(default)]
    pub project: Option<ProjectId>,

    /// Cycle the issue is planned into
    #[serde(default)]
    pub cycle: Option<CycleId>,

    /// Attached labels
    #[serde(default)]
    pub labels: Vec<LabelId>,

    /// Parent issue for subtasks
    #[serde(default)]
    pub parent: Option<IssueId>,
}

impl Issue {
    /// Short reference like `#12`
    #[must_use]
    pub fn reference(&self) -> String {
        format!("#{}", self.issue_number)
    }

    /// Case-insensitive substring match over title or description.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Data for creating a new issue
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    /// Issue title
    pub title: String,

    /// Issue description
    pub description: String,

    /// Initial status
    pub status: IssueStatus,

    /// Priority
    pub priority: IssuePriority,

    /// Issue type
    pub issue_type: IssueType,

    /// Estimate in hours
    pub estimated_hours: Option<f64>,

    /// Owning project
    pub project: Option<ProjectId>,

    /// Parent issue
    pub parent: Option<IssueId>,

    /// Labels to attach
    pub labels: Vec<LabelId>,

    /// Marks the issue as AI-generated
    pub is_ai_generated: bool,

    /// Tool that generated it
    pub ai_tool_used: Option<String>,
}

impl NewIssue {
    /// An issue with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the owning project.
    #[must_use]
    pub fn in_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Check field-level rules without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty title or a bad estimate.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::non_empty("title", &self.title)?;
        validate::optional_non_negative("estimated_hours", self.estimated_hours)?;
        Ok(())
    }

    /// Build the stored entity. References are checked by the store.
    ///
    /// # Errors
    ///
    /// Same as [`NewIssue::validate`].
    pub fn build(self, issue_number: u32, now: DateTime<Utc>) -> Result<Issue, ValidationError> {
        self.validate()?;
        let mut labels = self.labels;
        dedup_in_place(&mut labels);

        Ok(Issue {
            id: IssueId::new(),
            issue_number,
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status,
            priority: self.priority,
            issue_type: self.issue_type,
            created_at: now,
            updated_at: now,
            estimated_hours: self.estimated_hours,
            actual_hours: None,
            is_ai_generated: self.is_ai_generated,
            ai_tool_used: self.ai_tool_used,
            ai_generation_count: 0,
            ai_context_tokens: 0,
            project: self.project,
            cycle: None,
            labels,
            parent: self.parent,
        })
    }
}

fn dedup_in_place(labels: &mut Vec<LabelId>) {
    let mut seen = std::collections::HashSet::new();
    labels.retain(|id| seen.insert(*id));
}

/// Fields to change on an existing issue.
///
/// Double options distinguish "leave alone" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status
    pub status: Option<IssueStatus>,

    /// New priority
    pub priority: Option<IssuePriority>,

    /// New type
    pub issue_type: Option<IssueType>,

    /// New estimate
    pub estimated_hours: Option<Option<f64>>,

    /// New actual hours
    pub actual_hours: Option<Option<f64>>,

    /// Move to another project (re-numbers the issue)
    pub project: Option<Option<ProjectId>>,
}

impl IssueUpdate {
    /// Validate the plain fields without touching anything.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for an empty title or bad hours.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate::non_empty("title", title)?;
        }
        if let Some(hours) = self.estimated_hours {
            validate::optional_non_negative("estimated_hours", hours)?;
        }
        if let Some(hours) = self.actual_hours {
            validate::optional_non_negative("actual_hours", hours)?;
        }
        Ok(())
    }

    /// Apply the plain fields. The project move is handled by the store.
    pub(crate) fn apply_fields(&self, issue: &mut Issue, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            issue.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            issue.description.clone_from(description);
        }
        if let Some(status) = self.status {
            issue.status = status;
        }
        if let Some(priority) = self.priority {
            issue.priority = priority;
        }
        if let Some(issue_type) = self.issue_type {
            issue.issue_type = issue_type;
        }
        if let Some(hours) = self.estimated_hours {
            issue.estimated_hours = hours;
        }
        if let Some(hours) = self.actual_hours {
            issue.actual_hours = hours;
        }
        issue.updated_at = now;
    }
}
