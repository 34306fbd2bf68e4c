//! Status-grouped listings.

use crate::domain::{Issue, IssueStatus, IssueType};
use serde::Serialize;

/// Issues sharing one status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusGroup {
    /// Bucket status
    pub status: IssueStatus,

    /// Issues in input order
    pub issues: Vec<Issue>,
}

/// Bucket `issues` by status in canonical order.
///
/// Subtasks are left out and empty buckets are omitted.
#[must_use]
pub fn group_by_status(issues: &[Issue]) -> Vec<StatusGroup> {
    IssueStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let bucket: Vec<Issue> = issues
                .iter()
                .filter(|i| i.status == status && i.issue_type != IssueType::Subtask)
                .cloned()
                .collect();
            (!bucket.is_empty()).then_some(StatusGroup {
                status,
                issues: bucket,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewIssue;
    use chrono::Utc;

    fn issue(title: &str, status: IssueStatus, issue_type: IssueType) -> Issue {
        let mut new = NewIssue::titled(title);
        new.status = status;
        new.issue_type = issue_type;
        new.build(1, Utc::now()).unwrap()
    }

    #[test]
    fn canonical_order_without_empty_buckets() {
        let issues = vec![
            issue("d", IssueStatus::Done, IssueType::Task),
            issue("b", IssueStatus::Backlog, IssueType::Bug),
            issue("p", IssueStatus::InProgress, IssueType::Story),
        ];
        let groups = group_by_status(&issues);
        let statuses: Vec<_> = groups.iter().map(|g| g.status).collect();
        assert_eq!(
            statuses,
            [IssueStatus::Backlog, IssueStatus::InProgress, IssueStatus::Done]
        );
    }

    #[test]
    fn subtasks_excluded() {
        let issues = vec![
            issue("parent", IssueStatus::Todo, IssueType::Story),
            issue("child", IssueStatus::Todo, IssueType::Subtask),
            issue("orphan", IssueStatus::Done, IssueType::Subtask),
        ];
        let groups = group_by_status(&issues);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].issues.len(), 1);
        assert_eq!(groups[0].issues[0].title, "parent");
    }
}
