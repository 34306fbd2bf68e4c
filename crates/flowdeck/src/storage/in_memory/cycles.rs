//! Cycle operations and statistics.

use super::inner::InMemoryStorageInner;
use crate::domain::{Cycle, CycleId, CycleUpdate, Issue, IssueId, NewCycle, ProjectId};
use crate::error::{Result, ValidationError};
use crate::stats::{CycleStats, ProjectStats};
use chrono::{DateTime, Utc};

impl InMemoryStorageInner {
    pub(crate) fn create_cycle(&mut self, new_cycle: NewCycle) -> Result<Cycle> {
        if let Some(project) = &new_cycle.project {
            self.projects.require(project)?;
        }
        let cycle = new_cycle.build(Utc::now())?;
        self.cycles.insert(cycle.clone())?;
        tracing::debug!(cycle = %cycle.id, name = %cycle.name, "Created cycle");
        Ok(cycle)
    }

    pub(crate) fn update_cycle(&mut self, id: &CycleId, updates: CycleUpdate) -> Result<Cycle> {
        let mut cycle = self.cycles.require(id)?.clone();
        updates.apply_to(&mut cycle)?;
        self.cycles.update(cycle.clone())?;
        Ok(cycle)
    }

    /// Clear the cycle reference of every issue planned into `id`.
    fn detach_cycle_issues(&mut self, id: &CycleId) -> usize {
        let now = Utc::now();
        let mut detached = 0;
        for issue in self.issues.iter_mut() {
            if issue.cycle.as_ref() == Some(id) {
                issue.cycle = None;
                issue.updated_at = now;
                detached += 1;
            }
        }
        detached
    }

    pub(crate) fn delete_cycle(&mut self, id: &CycleId) -> Result<()> {
        self.cycles.require(id)?;
        let detached = self.detach_cycle_issues(id);
        self.cycles.remove(id);
        tracing::debug!(cycle = %id, detached, "Deleted cycle");
        Ok(())
    }

    /// Mark archived and release its issues.
    pub(crate) fn archive_cycle(&mut self, id: &CycleId) -> Result<Cycle> {
        self.cycles.require(id)?;
        self.detach_cycle_issues(id);
        let cycle = self.cycles.require_mut(id)?;
        cycle.is_archived = true;
        Ok(cycle.clone())
    }

    pub(crate) fn assign_issue_to_cycle(
        &mut self,
        issue: &IssueId,
        cycle: &CycleId,
    ) -> Result<Issue> {
        if self.cycles.require(cycle)?.is_archived {
            return Err(ValidationError::ArchivedCycle(*cycle).into());
        }
        let issue = self.issues.require_mut(issue)?;
        issue.cycle = Some(*cycle);
        issue.updated_at = Utc::now();
        Ok(issue.clone())
    }

    pub(crate) fn remove_issue_from_cycle(&mut self, issue: &IssueId) -> Result<Issue> {
        let issue = self.issues.require_mut(issue)?;
        issue.cycle = None;
        issue.updated_at = Utc::now();
        Ok(issue.clone())
    }

    /// Non-archived cycles, latest start first.
    pub(crate) fn list_cycles(&self, project: Option<&ProjectId>) -> Vec<Cycle> {
        self.cycles.fetch_sorted(
            |c| !c.is_archived && (project.is_none() || c.project.as_ref() == project),
            |a, b| b.start_date.cmp(&a.start_date),
        )
    }

    /// Non-archived cycles containing `now`, earliest start first.
    pub(crate) fn active_cycles(&self, now: DateTime<Utc>) -> Vec<Cycle> {
        self.cycles.fetch_sorted(
            |c| !c.is_archived && c.is_active_at(now),
            |a, b| a.start_date.cmp(&b.start_date),
        )
    }

    /// Non-archived cycles starting after `now`, earliest first.
    pub(crate) fn upcoming_cycles(&self, now: DateTime<Utc>) -> Vec<Cycle> {
        self.cycles.fetch_sorted(
            |c| !c.is_archived && c.start_date > now,
            |a, b| a.start_date.cmp(&b.start_date),
        )
    }

    pub(crate) fn cycle_issues(&self, id: &CycleId) -> Result<Vec<Issue>> {
        self.cycles.require(id)?;
        Ok(self.issues.fetch(|issue| issue.cycle.as_ref() == Some(id)))
    }

    pub(crate) fn cycle_stats(&self, id: &CycleId) -> Result<CycleStats> {
        let cycle = self.cycles.require(id)?;
        Ok(CycleStats::compute(
            cycle,
            self.issues.iter().filter(|issue| issue.cycle.as_ref() == Some(id)),
        ))
    }

    pub(crate) fn project_stats(&self, id: &ProjectId) -> Result<ProjectStats> {
        self.projects.require(id)?;
        Ok(ProjectStats::compute(
            self.issues.iter().filter(|issue| issue.project.as_ref() == Some(id)),
        ))
    }
}
