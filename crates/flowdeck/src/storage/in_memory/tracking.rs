//! AI activity records.

use super::inner::InMemoryStorageInner;
use crate::domain::{AiTrackingEvent, ContextSnapshot, IssueId, NewAiEvent, NewContextSnapshot};
use crate::error::Result;
use crate::stats::AiStats;
use chrono::{DateTime, Utc};

impl InMemoryStorageInner {
    /// Append an event; if it names an issue, fold it into the issue's AI metadata.
    pub(crate) fn track_ai_event(&mut self, new_event: NewAiEvent) -> Result<AiTrackingEvent> {
        if let Some(issue) = &new_event.issue {
            self.issues.require(issue)?;
        }
        let now = Utc::now();
        let event = new_event.build(now)?;
        self.ai_events.insert(event.clone())?;

        if let Some(issue_id) = &event.issue {
            let issue = self.issues.require_mut(issue_id)?;
            issue.is_ai_generated = true;
            issue.ai_tool_used = Some(event.ai_tool.clone());
            issue.ai_generation_count = issue.ai_generation_count.saturating_add(1);
            issue.ai_context_tokens = issue.ai_context_tokens.saturating_add(event.tokens_used);
            issue.updated_at = now;
        }
        tracing::debug!(
            event = %event.id,
            tool = %event.ai_tool,
            tokens = event.tokens_used,
            "Tracked AI event"
        );
        Ok(event)
    }

    /// Events newest first, optionally for one issue, at most `limit`.
    pub(crate) fn ai_events(
        &self,
        issue: Option<&IssueId>,
        limit: usize,
    ) -> Result<Vec<AiTrackingEvent>> {
        if let Some(issue) = issue {
            self.issues.require(issue)?;
        }
        let mut events = self.ai_events.fetch_sorted(
            |e| issue.is_none() || e.issue.as_ref() == issue,
            |a, b| b.timestamp.cmp(&a.timestamp),
        );
        events.truncate(limit);
        Ok(events)
    }

    pub(crate) fn save_context_snapshot(
        &mut self,
        new_snapshot: NewContextSnapshot,
    ) -> Result<ContextSnapshot> {
        if let Some(issue) = &new_snapshot.issue {
            self.issues.require(issue)?;
        }
        let snapshot = new_snapshot.build(Utc::now())?;
        self.snapshots.insert(snapshot.clone())?;
        Ok(snapshot)
    }

    /// Snapshots of `issue`, newest first.
    pub(crate) fn context_snapshots(&self, issue: &IssueId) -> Result<Vec<ContextSnapshot>> {
        self.issues.require(issue)?;
        Ok(self.snapshots.fetch_sorted(
            |s| s.issue.as_ref() == Some(issue),
            |a, b| b.timestamp.cmp(&a.timestamp),
        ))
    }

    pub(crate) fn ai_stats(&self, now: DateTime<Utc>) -> AiStats {
        AiStats::compute(self.ai_events.iter(), self.issues.iter(), now)
    }
}
