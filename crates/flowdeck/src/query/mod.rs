//! Issue filtering, sorting and grouping.
//!
//! Filters in an [`IssueQuery`] are conjunctive. The free-text search runs
//! last over whatever the structured filters left.

mod grouping;
mod sorting;

pub use grouping::{StatusGroup, group_by_status};
pub use sorting::sort_issues;

use crate::domain::{CycleId, Issue, IssuePriority, IssueStatus, IssueType, LabelId, ProjectId};
use serde::{Deserialize, Serialize};

/// Ordering applied to query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently updated first
    #[default]
    UpdatedDesc,

    /// Least recently updated first
    UpdatedAsc,

    /// Descending by raw priority rank, so `low` sorts before `urgent`
    PriorityHigh,

    /// Newest first
    CreatedDesc,
}

/// Filter and sort criteria for [`fetch_issues`](crate::storage::TrackerStorage::fetch_issues)
#[derive(Debug, Clone, Default)]
pub struct IssueQuery {
    /// Only issues in this project
    pub project: Option<ProjectId>,

    /// Only issues with this status
    pub status: Option<IssueStatus>,

    /// Only issues with this priority
    pub priority: Option<IssuePriority>,

    /// Only issues of this type
    pub issue_type: Option<IssueType>,

    /// Only issues planned into this cycle
    pub cycle: Option<CycleId>,

    /// Only issues carrying this label
    pub label: Option<LabelId>,

    /// Only AI-generated issues
    pub only_ai_generated: bool,

    /// Case-insensitive substring over title or description
    pub search_text: Option<String>,

    /// Result ordering
    pub sort: SortOrder,

    /// Truncate results after sorting
    pub limit: Option<usize>,
}

impl IssueQuery {
    /// Query matching every issue of `project`.
    #[must_use]
    pub fn for_project(project: ProjectId) -> Self {
        Self {
            project: Some(project),
            ..Self::default()
        }
    }

    /// The lowercase search needle, or `None` when blank.
    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_structured(&self, issue: &Issue) -> bool {
        if self.project.is_some() && issue.project != self.project {
            return false;
        }
        if self.status.is_some_and(|s| issue.status != s) {
            return false;
        }
        if self.priority.is_some_and(|p| issue.priority != p) {
            return false;
        }
        if self.issue_type.is_some_and(|t| issue.issue_type != t) {
            return false;
        }
        if self.cycle.is_some() && issue.cycle != self.cycle {
            return false;
        }
        if self.label.is_some_and(|l| !issue.labels.contains(&l)) {
            return false;
        }
        if self.only_ai_generated && !issue.is_ai_generated {
            return false;
        }
        true
    }

    /// Whether `issue` passes every filter, search included.
    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        self.matches_structured(issue) && self.needle().is_none_or(|n| issue.matches_text(&n))
    }

    /// Filter, sort and truncate `issues`.
    ///
    /// Input order is treated as insertion order and decides ties.
    pub fn apply<'a, I>(&self, issues: I) -> Vec<Issue>
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        let mut matched: Vec<Issue> = issues
            .into_iter()
            .filter(|issue| self.matches_structured(issue))
            .cloned()
            .collect();

        if let Some(needle) = self.needle() {
            matched.retain(|issue| issue.matches_text(&needle));
        }

        sort_issues(&mut matched, self.sort);

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}
