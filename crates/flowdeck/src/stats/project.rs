use super::ratio;
use crate::domain::{Issue, IssueStatus};
use serde::{Deserialize, Serialize};

/// Issue counts for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    /// All issues in the project
    pub total: usize,

    /// Issues done
    pub completed: usize,

    /// Issues in progress
    pub in_progress: usize,

    /// Issues in review
    pub in_review: usize,

    /// Issues in backlog (todo is not counted)
    pub backlog: usize,

    /// Issues flagged as AI-generated
    pub ai_generated: usize,
}

impl ProjectStats {
    /// Tally `issues`.
    pub fn compute<'a, I>(issues: I) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        issues.into_iter().fold(Self::default(), |mut stats, issue| {
            stats.total += 1;
            match issue.status {
                IssueStatus::Done => stats.completed += 1,
                IssueStatus::InProgress => stats.in_progress += 1,
                IssueStatus::InReview => stats.in_review += 1,
                IssueStatus::Backlog => stats.backlog += 1,
                IssueStatus::Todo => {}
            }
            if issue.is_ai_generated {
                stats.ai_generated += 1;
            }
            stats
        })
    }

    /// Percentage of issues done, 0 when the project is empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completed as f64, self.total as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewIssue;
    use chrono::Utc;

    fn issue(status: IssueStatus, ai: bool) -> Issue {
        let mut new = NewIssue::titled("work");
        new.status = status;
        new.is_ai_generated = ai;
        new.build(1, Utc::now()).unwrap()
    }

    #[test]
    fn empty_project() {
        let stats = ProjectStats::compute([]);
        assert_eq!(stats, ProjectStats::default());
        assert!(stats.completion_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn todo_is_not_backlog() {
        let issues = [
            issue(IssueStatus::Todo, false),
            issue(IssueStatus::Backlog, true),
            issue(IssueStatus::Done, true),
        ];
        let stats = ProjectStats::compute(&issues);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.backlog, 1);
        assert_eq!(stats.ai_generated, 2);
    }
}
