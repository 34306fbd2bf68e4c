//! Project and label operations.

use super::inner::InMemoryStorageInner;
use crate::domain::{
    Issue, IssueId, IssueLabel, LabelId, NewLabel, NewProject, Project, ProjectId, ProjectUpdate,
};
use crate::error::Result;
use crate::storage::DeleteSummary;
use chrono::Utc;

impl InMemoryStorageInner {
    pub(crate) fn create_project(&mut self, new_project: NewProject) -> Result<Project> {
        let now = Utc::now();
        let project = new_project.build(now)?;

        let labels = if self.options.seed_default_labels {
            NewLabel::defaults_for(project.id)
                .map(|label| label.build(now))
                .collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };

        self.projects.insert(project.clone())?;
        for label in labels {
            self.labels.insert(label)?;
        }
        tracing::debug!(project = %project.id, name = %project.name, "Created project");
        Ok(project)
    }

    pub(crate) fn update_project(
        &mut self,
        id: &ProjectId,
        updates: ProjectUpdate,
    ) -> Result<Project> {
        let mut project = self.projects.require(id)?.clone();
        updates.apply_to(&mut project, Utc::now())?;
        self.projects.update(project.clone())?;
        Ok(project)
    }

    pub(crate) fn delete_project(&mut self, id: &ProjectId) -> Result<DeleteSummary> {
        let plan = self.plan_project_delete(id)?;
        let summary = self.apply(plan);
        tracing::debug!(
            project = %id,
            issues = summary.issues,
            labels = summary.labels,
            "Deleted project"
        );
        Ok(summary)
    }

    /// Projects by `updated_at` descending, optionally filtered by a
    /// case-insensitive search over name and description.
    pub(crate) fn list_projects(&self, search: Option<&str>) -> Vec<Project> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        self.projects.fetch_sorted(
            |project| {
                needle.as_deref().is_none_or(|n| {
                    project.name.to_lowercase().contains(n)
                        || project.description.to_lowercase().contains(n)
                })
            },
            |a, b| b.updated_at.cmp(&a.updated_at),
        )
    }

    pub(crate) fn create_label(&mut self, new_label: NewLabel) -> Result<IssueLabel> {
        if let Some(project) = &new_label.project {
            self.projects.require(project)?;
        }
        let label = new_label.build(Utc::now())?;
        self.labels.insert(label.clone())?;
        Ok(label)
    }

    pub(crate) fn list_labels(&self, project: Option<&ProjectId>) -> Vec<IssueLabel> {
        self.labels
            .fetch(|label| project.is_none() || label.project.as_ref() == project)
    }

    /// Remove a label and detach it from every issue carrying it.
    pub(crate) fn delete_label(&mut self, id: &LabelId) -> Result<()> {
        self.labels.require(id)?;
        self.labels.remove(id);
        for issue in self.issues.iter_mut() {
            issue.labels.retain(|label| label != id);
        }
        Ok(())
    }

    pub(crate) fn add_label_to_issue(
        &mut self,
        issue_id: &IssueId,
        label: &LabelId,
    ) -> Result<Issue> {
        self.labels.require(label)?;
        let issue = self.issues.require_mut(issue_id)?;
        if !issue.labels.contains(label) {
            issue.labels.push(*label);
            issue.updated_at = Utc::now();
        }
        Ok(issue.clone())
    }

    pub(crate) fn remove_label_from_issue(
        &mut self,
        issue_id: &IssueId,
        label: &LabelId,
    ) -> Result<Issue> {
        self.labels.require(label)?;
        let issue = self.issues.require_mut(issue_id)?;
        let before = issue.labels.len();
        issue.labels.retain(|l| l != label);
        if issue.labels.len() != before {
            issue.updated_at = Utc::now();
        }
        Ok(issue.clone())
    }
}
