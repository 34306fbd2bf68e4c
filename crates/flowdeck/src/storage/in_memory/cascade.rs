//! Cascade and nullify planning for deletes.
//!
//! A [`DeletePlan`] is computed from an immutable borrow of the store. Every
//! lookup that can fail happens while planning, so [`DeletePlan::apply`]
//! cannot fail and a delete either happens in full or not at all.
//!
//! Ownership rules:
//! - a project owns its issues and labels; cycles only lose the reference
//! - an issue owns its comments and, transitively, its subtasks
//! - AI events and context snapshots only lose their issue reference

use super::inner::InMemoryStorageInner;
use crate::domain::{CommentId, CycleId, IssueId, LabelId, ProjectId};
use crate::error::Result;
use crate::storage::DeleteSummary;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub(crate) struct DeletePlan {
    project: Option<ProjectId>,
    issues: Vec<IssueId>,
    comments: Vec<CommentId>,
    labels: Vec<LabelId>,
    detached_cycles: Vec<CycleId>,
}

impl InMemoryStorageInner {
    /// Plan deleting `roots` together with all their subtasks and comments.
    pub(crate) fn plan_issue_delete(&self, roots: &[IssueId]) -> Result<DeletePlan> {
        for id in roots {
            self.issues.require(id)?;
        }
        let mut plan = DeletePlan::default();
        self.collect_issue_tree(roots.iter().copied(), &mut plan);
        Ok(plan)
    }

    /// Plan deleting a project with its issues, their subtasks, comments and
    /// labels. Cycles in the project are kept and detached.
    pub(crate) fn plan_project_delete(&self, id: &ProjectId) -> Result<DeletePlan> {
        self.projects.require(id)?;

        let mut plan = DeletePlan {
            project: Some(*id),
            ..DeletePlan::default()
        };
        let roots = self
            .issues
            .iter()
            .filter(|issue| issue.project.as_ref() == Some(id))
            .map(|issue| issue.id);
        self.collect_issue_tree(roots, &mut plan);

        plan.labels = self
            .labels
            .iter()
            .filter(|label| label.project.as_ref() == Some(id))
            .map(|label| label.id)
            .collect();
        plan.detached_cycles = self
            .cycles
            .iter()
            .filter(|cycle| cycle.project.as_ref() == Some(id))
            .map(|cycle| cycle.id)
            .collect();
        Ok(plan)
    }

    fn collect_issue_tree(&self, roots: impl Iterator<Item = IssueId>, plan: &mut DeletePlan) {
        let mut seen: HashSet<IssueId> = HashSet::new();
        for root in roots {
            if seen.insert(root) {
                plan.issues.push(root);
            }
            for child in self.hierarchy.descendants(&root) {
                if seen.insert(child) {
                    plan.issues.push(child);
                }
            }
        }
        plan.comments = self
            .comments
            .iter()
            .filter(|comment| seen.contains(&comment.issue))
            .map(|comment| comment.id)
            .collect();
    }

    /// Carry out a plan produced by one of the `plan_*` methods.
    pub(crate) fn apply(&mut self, plan: DeletePlan) -> DeleteSummary {
        let deleted: HashSet<IssueId> = plan.issues.iter().copied().collect();
        let dropped_labels: HashSet<LabelId> = plan.labels.iter().copied().collect();

        for id in &plan.comments {
            self.comments.remove(id);
        }
        for id in &plan.issues {
            self.issues.remove(id);
            self.hierarchy.remove_issue(id);
        }
        for id in &plan.labels {
            self.labels.remove(id);
        }
        if !dropped_labels.is_empty() {
            for issue in self.issues.iter_mut() {
                issue.labels.retain(|label| !dropped_labels.contains(label));
            }
        }
        for id in &plan.detached_cycles {
            if let Some(cycle) = self.cycles.get_mut(id) {
                cycle.project = None;
            }
        }

        let mut detached_records = 0;
        for event in self.ai_events.iter_mut() {
            if event.issue.is_some_and(|i| deleted.contains(&i)) {
                event.issue = None;
                detached_records += 1;
            }
        }
        for snapshot in self.snapshots.iter_mut() {
            if snapshot.issue.is_some_and(|i| deleted.contains(&i)) {
                snapshot.issue = None;
                detached_records += 1;
            }
        }

        if let Some(project) = plan.project {
            self.projects.remove(&project);
        }

        DeleteSummary {
            projects: usize::from(plan.project.is_some()),
            issues: plan.issues.len(),
            comments: plan.comments.len(),
            labels: plan.labels.len(),
            detached_cycles: plan.detached_cycles.len(),
            detached_records,
        }
    }
}
