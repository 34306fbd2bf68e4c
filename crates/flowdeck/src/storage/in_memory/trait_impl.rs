//! `TrackerStorage` implementation for in-memory storage.
//!
//! Each method takes the lock once and delegates to the synchronous
//! operation on [`InMemoryStorageInner`].

use super::InMemoryStorage;
use super::inner::InMemoryStorageInner;
use super::integrity::reconcile;
use crate::domain::{
    AiTrackingEvent, Comment, CommentId, ContextSnapshot, Cycle, CycleId, CycleUpdate, Dataset,
    Issue, IssueId, IssueLabel, IssueStatus, IssueUpdate, LabelId, NewAiEvent, NewComment,
    NewContextSnapshot, NewCycle, NewIssue, NewLabel, NewProject, Project, ProjectId,
    ProjectUpdate,
};
use crate::error::Result;
use crate::query::IssueQuery;
use crate::stats::{AiStats, CycleStats, ProjectStats};
use crate::storage::{DeleteSummary, TrackerStorage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl TrackerStorage for InMemoryStorage {
    async fn create_project(&mut self, project: NewProject) -> Result<Project> {
        self.lock().await.create_project(project)
    }

    async fn get_project(&self, id: &ProjectId) -> Result<Option<Project>> {
        Ok(self.lock().await.projects.get(id).cloned())
    }

    async fn update_project(&mut self, id: &ProjectId, updates: ProjectUpdate) -> Result<Project> {
        self.lock().await.update_project(id, updates)
    }

    async fn delete_project(&mut self, id: &ProjectId) -> Result<DeleteSummary> {
        self.lock().await.delete_project(id)
    }

    async fn list_projects(&self, search: Option<&str>) -> Result<Vec<Project>> {
        Ok(self.lock().await.list_projects(search))
    }

    async fn create_label(&mut self, label: NewLabel) -> Result<IssueLabel> {
        self.lock().await.create_label(label)
    }

    async fn list_labels(&self, project: Option<&ProjectId>) -> Result<Vec<IssueLabel>> {
        Ok(self.lock().await.list_labels(project))
    }

    async fn delete_label(&mut self, id: &LabelId) -> Result<()> {
        self.lock().await.delete_label(id)
    }

    async fn add_label_to_issue(&mut self, issue: &IssueId, label: &LabelId) -> Result<Issue> {
        self.lock().await.add_label_to_issue(issue, label)
    }

    async fn remove_label_from_issue(
        &mut self,
        issue: &IssueId,
        label: &LabelId,
    ) -> Result<Issue> {
        self.lock().await.remove_label_from_issue(issue, label)
    }

    async fn create_issue(&mut self, issue: NewIssue) -> Result<Issue> {
        self.lock().await.create_issue(issue)
    }

    async fn get_issue(&self, id: &IssueId) -> Result<Option<Issue>> {
        Ok(self.lock().await.issues.get(id).cloned())
    }

    async fn update_issue(&mut self, id: &IssueId, updates: IssueUpdate) -> Result<Issue> {
        self.lock().await.update_issue(id, updates)
    }

    async fn change_status(&mut self, id: &IssueId, status: IssueStatus) -> Result<Issue> {
        self.lock().await.change_status(id, status)
    }

    async fn delete_issue(&mut self, id: &IssueId) -> Result<DeleteSummary> {
        self.lock().await.delete_issues(std::slice::from_ref(id))
    }

    async fn delete_issues(&mut self, ids: &[IssueId]) -> Result<DeleteSummary> {
        self.lock().await.delete_issues(ids)
    }

    async fn subtasks(&self, id: &IssueId) -> Result<Vec<Issue>> {
        self.lock().await.subtasks(id)
    }

    async fn set_parent(&mut self, id: &IssueId, parent: Option<&IssueId>) -> Result<Issue> {
        self.lock().await.set_parent(id, parent)
    }

    async fn next_issue_number(&self, project: Option<&ProjectId>) -> Result<u32> {
        Ok(self.lock().await.next_issue_number(project))
    }

    async fn fetch_issues(&self, query: &IssueQuery) -> Result<Vec<Issue>> {
        Ok(self.lock().await.fetch_issues(query))
    }

    async fn issues_created_since(&self, since: DateTime<Utc>) -> Result<Vec<Issue>> {
        Ok(self.lock().await.issues_created_since(since))
    }

    async fn status_count(
        &self,
        status: IssueStatus,
        project: Option<&ProjectId>,
    ) -> Result<usize> {
        Ok(self.lock().await.status_count(status, project))
    }

    async fn add_comment(&mut self, comment: NewComment) -> Result<Comment> {
        self.lock().await.add_comment(comment)
    }

    async fn list_comments(&self, issue: &IssueId) -> Result<Vec<Comment>> {
        self.lock().await.list_comments(issue)
    }

    async fn delete_comment(&mut self, id: &CommentId) -> Result<()> {
        self.lock().await.delete_comment(id)
    }

    async fn create_cycle(&mut self, cycle: NewCycle) -> Result<Cycle> {
        self.lock().await.create_cycle(cycle)
    }

    async fn get_cycle(&self, id: &CycleId) -> Result<Option<Cycle>> {
        Ok(self.lock().await.cycles.get(id).cloned())
    }

    async fn update_cycle(&mut self, id: &CycleId, updates: CycleUpdate) -> Result<Cycle> {
        self.lock().await.update_cycle(id, updates)
    }

    async fn delete_cycle(&mut self, id: &CycleId) -> Result<()> {
        self.lock().await.delete_cycle(id)
    }

    async fn archive_cycle(&mut self, id: &CycleId) -> Result<Cycle> {
        self.lock().await.archive_cycle(id)
    }

    async fn assign_issue_to_cycle(&mut self, issue: &IssueId, cycle: &CycleId) -> Result<Issue> {
        self.lock().await.assign_issue_to_cycle(issue, cycle)
    }

    async fn remove_issue_from_cycle(&mut self, issue: &IssueId) -> Result<Issue> {
        self.lock().await.remove_issue_from_cycle(issue)
    }

    async fn list_cycles(&self, project: Option<&ProjectId>) -> Result<Vec<Cycle>> {
        Ok(self.lock().await.list_cycles(project))
    }

    async fn active_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>> {
        Ok(self.lock().await.active_cycles(now))
    }

    async fn upcoming_cycles(&self, now: DateTime<Utc>) -> Result<Vec<Cycle>> {
        Ok(self.lock().await.upcoming_cycles(now))
    }

    async fn cycle_issues(&self, id: &CycleId) -> Result<Vec<Issue>> {
        self.lock().await.cycle_issues(id)
    }

    async fn cycle_stats(&self, id: &CycleId) -> Result<CycleStats> {
        self.lock().await.cycle_stats(id)
    }

    async fn project_stats(&self, id: &ProjectId) -> Result<ProjectStats> {
        self.lock().await.project_stats(id)
    }

    async fn ai_stats(&self, now: DateTime<Utc>) -> Result<AiStats> {
        Ok(self.lock().await.ai_stats(now))
    }

    async fn track_ai_event(&mut self, event: NewAiEvent) -> Result<AiTrackingEvent> {
        self.lock().await.track_ai_event(event)
    }

    async fn ai_events(
        &self,
        issue: Option<&IssueId>,
        limit: usize,
    ) -> Result<Vec<AiTrackingEvent>> {
        self.lock().await.ai_events(issue, limit)
    }

    async fn save_context_snapshot(
        &mut self,
        snapshot: NewContextSnapshot,
    ) -> Result<ContextSnapshot> {
        self.lock().await.save_context_snapshot(snapshot)
    }

    async fn context_snapshots(&self, issue: &IssueId) -> Result<Vec<ContextSnapshot>> {
        self.lock().await.context_snapshots(issue)
    }

    async fn import_all(&mut self, mut data: Dataset) -> Result<()> {
        // Validate fully before touching the current contents
        reconcile(&mut data, true)?;
        let mut inner = self.lock().await;
        let replacement = InMemoryStorageInner::from_dataset(data, inner.options)?;
        *inner = replacement;
        Ok(())
    }

    async fn export_all(&self) -> Result<Dataset> {
        Ok(self.lock().await.export())
    }

    async fn save(&self) -> Result<()> {
        // In-memory storage has nothing to persist
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // No backing file to reload from
        Ok(())
    }
}
