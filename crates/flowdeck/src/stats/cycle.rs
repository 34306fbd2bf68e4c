use super::ratio;
use crate::domain::{Cycle, Issue, IssueStatus};
use serde::{Deserialize, Serialize};

/// Progress of one cycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    /// Issues assigned to the cycle
    pub total: usize,

    /// Issues done
    pub completed: usize,

    /// Issues in progress
    pub in_progress: usize,

    /// Issues in review
    pub in_review: usize,

    /// Issues in backlog or todo
    pub backlog: usize,

    /// Sum of estimates, ignoring unset values
    pub estimated_hours: f64,

    /// Sum of actual hours, ignoring unset values
    pub actual_hours: f64,

    /// The cycle's capacity in hours
    pub capacity: f64,
}

impl CycleStats {
    /// Tally `issues` against `cycle`'s capacity.
    pub fn compute<'a, I>(cycle: &Cycle, issues: I) -> Self
    where
        I: IntoIterator<Item = &'a Issue>,
    {
        let mut stats = Self {
            capacity: cycle.total_capacity,
            ..Self::default()
        };
        for issue in issues {
            stats.total += 1;
            match issue.status {
                IssueStatus::Done => stats.completed += 1,
                IssueStatus::InProgress => stats.in_progress += 1,
                IssueStatus::InReview => stats.in_review += 1,
                IssueStatus::Backlog | IssueStatus::Todo => stats.backlog += 1,
            }
            stats.estimated_hours += issue.estimated_hours.unwrap_or(0.0);
            stats.actual_hours += issue.actual_hours.unwrap_or(0.0);
        }
        stats
    }

    /// Percentage of issues done, 0 for an empty cycle.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completed as f64, self.total as f64) * 100.0
    }

    /// Estimated hours as a percentage of capacity, 0 when capacity is 0.
    #[must_use]
    pub fn capacity_used(&self) -> f64 {
        ratio(self.estimated_hours, self.capacity) * 100.0
    }

    /// Two points per completed issue.
    #[must_use]
    pub fn velocity(&self) -> usize {
        self.completed * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCycle, NewIssue};
    use chrono::{Duration, Utc};

    fn cycle(capacity: f64) -> Cycle {
        let now = Utc::now();
        let mut new = NewCycle::new("Sprint", now, now + Duration::days(14));
        new.total_capacity = capacity;
        new.build(now).unwrap()
    }

    fn issue(status: IssueStatus, estimate: Option<f64>, actual: Option<f64>) -> Issue {
        let mut new = NewIssue::titled("work");
        new.status = status;
        new.estimated_hours = estimate;
        let mut issue = new.build(1, Utc::now()).unwrap();
        issue.actual_hours = actual;
        issue
    }

    #[test]
    fn empty_cycle_rates_are_zero() {
        let stats = CycleStats::compute(&cycle(40.0), []);
        assert_eq!(stats.total, 0);
        assert!(stats.completion_rate().abs() < f64::EPSILON);
        assert!(stats.capacity_used().abs() < f64::EPSILON);
    }

    #[test]
    fn rates_are_percentages() {
        let issues = [
            issue(IssueStatus::Done, Some(10.0), None),
            issue(IssueStatus::Todo, Some(10.0), None),
        ];
        let stats = CycleStats::compute(&cycle(40.0), &issues);
        assert!((stats.completion_rate() - 50.0).abs() < 1e-9);
        assert!((stats.capacity_used() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_gives_zero_usage() {
        let issues = [issue(IssueStatus::Todo, Some(8.0), None)];
        let stats = CycleStats::compute(&cycle(0.0), &issues);
        assert!(stats.capacity_used().abs() < f64::EPSILON);
    }

    #[test]
    fn tallies_statuses_and_hours() {
        let issues = [
            issue(IssueStatus::Done, Some(4.0), Some(5.0)),
            issue(IssueStatus::Done, None, Some(1.0)),
            issue(IssueStatus::InProgress, Some(6.0), None),
            issue(IssueStatus::InReview, Some(2.0), None),
            issue(IssueStatus::Todo, Some(8.0), None),
            issue(IssueStatus::Backlog, None, None),
        ];
        let stats = CycleStats::compute(&cycle(40.0), &issues);

        assert_eq!(stats.total, 6);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.in_review, 1);
        assert_eq!(stats.backlog, 2);
        assert!((stats.estimated_hours - 20.0).abs() < 1e-9);
        assert!((stats.actual_hours - 6.0).abs() < 1e-9);
        assert!((stats.capacity_used() - 50.0).abs() < 1e-9);
        assert!((stats.completion_rate() - 200.0 / 6.0).abs() < 1e-9);
        assert_eq!(stats.velocity(), 4);
    }
}
