//! Per-project issue numbering.
//!
//! Numbers are derived from the issues present when asked: the next number
//! is one past the highest in the project. Callers hold the storage lock
//! between computing a number and inserting the issue.

use crate::domain::{Issue, ProjectId};

/// Next issue number for `project`; 1 when it has no issues or is `None`.
pub(crate) fn next_issue_number<'a, I>(issues: I, project: Option<&ProjectId>) -> u32
where
    I: IntoIterator<Item = &'a Issue>,
{
    let Some(project) = project else {
        return 1;
    };
    issues
        .into_iter()
        .filter(|issue| issue.project.as_ref() == Some(project))
        .map(|issue| issue.issue_number)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewIssue;
    use chrono::Utc;
    use proptest::prelude::*;

    fn numbered(project: Option<ProjectId>, number: u32) -> Issue {
        let mut new = NewIssue::titled("n");
        new.project = project;
        new.build(number, Utc::now()).unwrap()
    }

    #[test]
    fn empty_project_starts_at_one() {
        let project = ProjectId::new();
        assert_eq!(next_issue_number([], Some(&project)), 1);
    }

    #[test]
    fn no_project_is_always_one() {
        let issues = [numbered(None, 7)];
        assert_eq!(next_issue_number(&issues, None), 1);
    }

    #[test]
    fn uses_max_not_count() {
        let project = ProjectId::new();
        let issues = [numbered(Some(project), 1), numbered(Some(project), 5)];
        assert_eq!(next_issue_number(&issues, Some(&project)), 6);
    }

    #[test]
    fn other_projects_ignored() {
        let a = ProjectId::new();
        let b = ProjectId::new();
        let issues = [numbered(Some(a), 9), numbered(Some(b), 2)];
        assert_eq!(next_issue_number(&issues, Some(&b)), 3);
    }

    proptest! {
        #[test]
        fn sequential_assignment_never_repeats(
            existing in proptest::collection::vec(1u32..500, 0..20),
            adds in 1usize..30,
        ) {
            let project = ProjectId::new();
            let mut issues: Vec<Issue> = existing
                .iter()
                .map(|n| numbered(Some(project), *n))
                .collect();
            let before_max = existing.iter().copied().max().unwrap_or(0);

            let mut assigned = std::collections::HashSet::new();
            for _ in 0..adds {
                let next = next_issue_number(&issues, Some(&project));
                prop_assert!(next > before_max);
                prop_assert!(assigned.insert(next));
                issues.push(numbered(Some(project), next));
            }
        }
    }
}
