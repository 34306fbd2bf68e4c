//! Issue and comment operations.

use super::inner::InMemoryStorageInner;
use super::numbering;
use crate::domain::{
    Comment, CommentId, Issue, IssueId, IssueStatus, IssueUpdate, NewComment, NewIssue, ProjectId,
};
use crate::error::{Result, ValidationError};
use crate::query::{IssueQuery, SortOrder, sort_issues};
use crate::storage::DeleteSummary;
use chrono::{DateTime, Utc};

impl InMemoryStorageInner {
    pub(crate) fn create_issue(&mut self, new_issue: NewIssue) -> Result<Issue> {
        // === Phase 1: validation (no mutations) ===
        new_issue.validate()?;
        if let Some(project) = &new_issue.project {
            self.projects.require(project)?;
        }
        if let Some(parent) = &new_issue.parent {
            self.issues.require(parent)?;
        }
        for label in &new_issue.labels {
            self.labels.require(label)?;
        }

        // === Phase 2: numbering and insert ===
        let number = self.next_issue_number(new_issue.project.as_ref());
        let issue = new_issue.build(number, Utc::now())?;

        self.issues.insert(issue.clone())?;
        self.hierarchy.add_issue(issue.id);
        if issue.parent.is_some() {
            self.hierarchy.set_parent(&issue.id, issue.parent.as_ref());
        }
        tracing::debug!(issue = %issue.id, number = issue.issue_number, "Created issue");
        Ok(issue)
    }

    pub(crate) fn next_issue_number(&self, project: Option<&ProjectId>) -> u32 {
        numbering::next_issue_number(self.issues.iter(), project)
    }

    /// Apply `updates`. Moving to another project assigns the next number
    /// in the target project.
    pub(crate) fn update_issue(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue> {
        updates.validate()?;
        let current = self.issues.require(id)?;

        let renumber = match updates.project {
            Some(target) if target != current.project => {
                if let Some(project) = &target {
                    self.projects.require(project)?;
                }
                Some((target, self.next_issue_number(target.as_ref())))
            }
            _ => None,
        };

        let mut issue = current.clone();
        updates.apply_fields(&mut issue, Utc::now());
        if let Some((project, number)) = renumber {
            issue.project = project;
            issue.issue_number = number;
        }
        self.issues.update(issue.clone())?;
        Ok(issue)
    }

    pub(crate) fn change_status(&mut self, id: &IssueId, status: IssueStatus) -> Result<Issue> {
        let issue = self.issues.require_mut(id)?;
        issue.status = status;
        issue.updated_at = Utc::now();
        Ok(issue.clone())
    }

    pub(crate) fn delete_issues(&mut self, ids: &[IssueId]) -> Result<DeleteSummary> {
        let plan = self.plan_issue_delete(ids)?;
        let summary = self.apply(plan);
        tracing::debug!(
            requested = ids.len(),
            issues = summary.issues,
            comments = summary.comments,
            "Deleted issues"
        );
        Ok(summary)
    }

    /// Direct children of `id`, in insertion order.
    pub(crate) fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>> {
        self.issues.require(id)?;
        Ok(self.issues.fetch(|issue| issue.parent.as_ref() == Some(id)))
    }

    pub(crate) fn set_parent(&mut self, id: &IssueId, parent: Option<&IssueId>) -> Result<Issue> {
        self.issues.require(id)?;
        if let Some(parent) = parent {
            self.issues.require(parent)?;
            if self.hierarchy.would_create_cycle(id, parent) {
                return Err(ValidationError::HierarchyCycle {
                    issue: *id,
                    parent: *parent,
                }
                .into());
            }
        }

        self.hierarchy.set_parent(id, parent);
        let issue = self.issues.require_mut(id)?;
        issue.parent = parent.copied();
        issue.updated_at = Utc::now();
        Ok(issue.clone())
    }

    pub(crate) fn fetch_issues(&self, query: &IssueQuery) -> Vec<Issue> {
        query.apply(self.issues.iter())
    }

    /// Issues created at or after `since`, newest first.
    pub(crate) fn issues_created_since(&self, since: DateTime<Utc>) -> Vec<Issue> {
        let mut issues = self.issues.fetch(|issue| issue.created_at >= since);
        sort_issues(&mut issues, SortOrder::CreatedDesc);
        issues
    }

    pub(crate) fn status_count(&self, status: IssueStatus, project: Option<&ProjectId>) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.status == status)
            .filter(|issue| project.is_none() || issue.project.as_ref() == project)
            .count()
    }

    /// Add a comment and refresh the issue's `updated_at`.
    pub(crate) fn add_comment(&mut self, new_comment: NewComment) -> Result<Comment> {
        self.issues.require(&new_comment.issue)?;
        let now = Utc::now();
        let comment = new_comment.build(now)?;
        self.comments.insert(comment.clone())?;
        self.issues.require_mut(&comment.issue)?.updated_at = now;
        Ok(comment)
    }

    /// Comments on `issue`, oldest first.
    pub(crate) fn list_comments(&self, issue: &IssueId) -> Result<Vec<Comment>> {
        self.issues.require(issue)?;
        Ok(self
            .comments
            .fetch_sorted(|c| c.issue == *issue, |a, b| a.created_at.cmp(&b.created_at)))
    }

    pub(crate) fn delete_comment(&mut self, id: &CommentId) -> Result<()> {
        self.comments.require(id)?;
        self.comments.remove(id);
        Ok(())
    }
}
