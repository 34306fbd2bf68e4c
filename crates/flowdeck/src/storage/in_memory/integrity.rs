//! Cross-reference checks for datasets coming from outside the store.
//!
//! `import_all` runs these strictly and rejects the first problem. Loading
//! from disk runs them leniently: problems are repaired (references cleared,
//! orphaned comments dropped, clashing issue numbers reassigned) and
//! reported as [`LoadWarning`]s.

use super::hierarchy::Hierarchy;
use super::jsonl::LoadWarning;
use super::table::Entity;
use crate::domain::{Dataset, EntityKind, IssueId, ProjectId};
use crate::error::{Error, Result, ValidationError};
use std::collections::{HashMap, HashSet};

struct Reporter {
    strict: bool,
    warnings: Vec<LoadWarning>,
}

impl Reporter {
    fn report(&mut self, warning: LoadWarning) -> Result<()> {
        if self.strict {
            return Err(warning.into_error());
        }
        self.warnings.push(warning);
        Ok(())
    }
}

impl LoadWarning {
    fn into_error(self) -> Error {
        match self {
            Self::MalformedJson { line_number, error } => {
                crate::error::PersistenceError::InvalidData(format!(
                    "line {line_number}: {error}"
                ))
                .into()
            }
            Self::DuplicateRecord { kind, id } => Error::DuplicateKey { kind, id },
            Self::DanglingReference { target_kind, target, .. } => Error::NotFound {
                kind: target_kind,
                id: target,
            },
            Self::HierarchyCycle { issue, parent } => {
                ValidationError::HierarchyCycle { issue, parent }.into()
            }
            Self::RenumberedIssue { project, from, .. } => {
                ValidationError::DuplicateIssueNumber {
                    project,
                    number: from,
                }
                .into()
            }
        }
    }
}

fn dedup<T: Entity>(rows: &mut Vec<T>, reporter: &mut Reporter) -> Result<()> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(rows.len());
    for row in rows.drain(..) {
        if seen.insert(row.id()) {
            kept.push(row);
        } else {
            reporter.report(LoadWarning::DuplicateRecord {
                kind: T::KIND,
                id: row.id().to_string(),
            })?;
        }
    }
    *rows = kept;
    Ok(())
}

fn dangling(
    kind: EntityKind,
    id: impl ToString,
    field: &'static str,
    target_kind: EntityKind,
    target: impl ToString,
) -> LoadWarning {
    LoadWarning::DanglingReference {
        kind,
        id: id.to_string(),
        field,
        target_kind,
        target: target.to_string(),
    }
}

/// Check every reference in `data`, repairing in lenient mode.
pub(crate) fn reconcile(data: &mut Dataset, strict: bool) -> Result<Vec<LoadWarning>> {
    let mut reporter = Reporter {
        strict,
        warnings: Vec::new(),
    };

    dedup(&mut data.projects, &mut reporter)?;
    dedup(&mut data.labels, &mut reporter)?;
    dedup(&mut data.issues, &mut reporter)?;
    dedup(&mut data.comments, &mut reporter)?;
    dedup(&mut data.cycles, &mut reporter)?;
    dedup(&mut data.ai_events, &mut reporter)?;
    dedup(&mut data.snapshots, &mut reporter)?;

    let projects: HashSet<_> = data.projects.iter().map(|p| p.id).collect();
    let labels: HashSet<_> = data.labels.iter().map(|l| l.id).collect();
    let cycles: HashSet<_> = data.cycles.iter().map(|c| c.id).collect();
    let issues: HashSet<_> = data.issues.iter().map(|i| i.id).collect();

    for label in &mut data.labels {
        if let Some(project) = label.project.filter(|p| !projects.contains(p)) {
            reporter.report(dangling(
                EntityKind::Label,
                label.id,
                "project",
                EntityKind::Project,
                project,
            ))?;
            label.project = None;
        }
    }

    for cycle in &mut data.cycles {
        if let Some(project) = cycle.project.filter(|p| !projects.contains(p)) {
            reporter.report(dangling(
                EntityKind::Cycle,
                cycle.id,
                "project",
                EntityKind::Project,
                project,
            ))?;
            cycle.project = None;
        }
    }

    for issue in &mut data.issues {
        if let Some(project) = issue.project.filter(|p| !projects.contains(p)) {
            reporter.report(dangling(
                EntityKind::Issue,
                issue.id,
                "project",
                EntityKind::Project,
                project,
            ))?;
            issue.project = None;
        }
        if let Some(cycle) = issue.cycle.filter(|c| !cycles.contains(c)) {
            reporter.report(dangling(
                EntityKind::Issue,
                issue.id,
                "cycle",
                EntityKind::Cycle,
                cycle,
            ))?;
            issue.cycle = None;
        }
        if let Some(parent) = issue.parent.filter(|p| !issues.contains(p)) {
            reporter.report(dangling(
                EntityKind::Issue,
                issue.id,
                "parent",
                EntityKind::Issue,
                parent,
            ))?;
            issue.parent = None;
        }
        let mut missing = Vec::new();
        issue.labels.retain(|label| {
            let known = labels.contains(label);
            if !known {
                missing.push(*label);
            }
            known
        });
        for label in missing {
            reporter.report(dangling(
                EntityKind::Issue,
                issue.id,
                "labels",
                EntityKind::Label,
                label,
            ))?;
        }
    }

    let (_, loops) = Hierarchy::rebuild(data.issues.iter().map(|i| (i.id, i.parent)));
    let looping: HashMap<IssueId, IssueId> = loops.into_iter().collect();
    for issue in &mut data.issues {
        if let Some(&parent) = looping.get(&issue.id) {
            reporter.report(LoadWarning::HierarchyCycle {
                issue: issue.id,
                parent,
            })?;
            issue.parent = None;
        }
    }

    let mut kept_comments = Vec::with_capacity(data.comments.len());
    for comment in data.comments.drain(..) {
        if issues.contains(&comment.issue) {
            kept_comments.push(comment);
        } else {
            reporter.report(dangling(
                EntityKind::Comment,
                comment.id,
                "issue",
                EntityKind::Issue,
                comment.issue,
            ))?;
        }
    }
    data.comments = kept_comments;

    for event in &mut data.ai_events {
        if let Some(issue) = event.issue.filter(|i| !issues.contains(i)) {
            reporter.report(dangling(
                EntityKind::AiEvent,
                event.id,
                "issue",
                EntityKind::Issue,
                issue,
            ))?;
            event.issue = None;
        }
    }
    for snapshot in &mut data.snapshots {
        if let Some(issue) = snapshot.issue.filter(|i| !issues.contains(i)) {
            reporter.report(dangling(
                EntityKind::ContextSnapshot,
                snapshot.id,
                "issue",
                EntityKind::Issue,
                issue,
            ))?;
            snapshot.issue = None;
        }
    }

    renumber_duplicates(data, &mut reporter)?;

    Ok(reporter.warnings)
}

fn renumber_duplicates(data: &mut Dataset, reporter: &mut Reporter) -> Result<()> {
    let mut max_by_project: HashMap<ProjectId, u32> = HashMap::new();
    for issue in &data.issues {
        if let Some(project) = issue.project {
            let max = max_by_project.entry(project).or_default();
            *max = (*max).max(issue.issue_number);
        }
    }

    let mut used: HashSet<(ProjectId, u32)> = HashSet::new();
    for issue in &mut data.issues {
        let Some(project) = issue.project else { continue };
        if issue.issue_number > 0 && used.insert((project, issue.issue_number)) {
            continue;
        }
        let max = max_by_project.entry(project).or_default();
        *max += 1;
        reporter.report(LoadWarning::RenumberedIssue {
            issue: issue.id,
            project,
            from: issue.issue_number,
            to: *max,
        })?;
        issue.issue_number = *max;
        used.insert((project, *max));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewComment, NewIssue, NewProject};
    use chrono::Utc;

    fn dataset_with_issue() -> Dataset {
        let project = NewProject::named("P").build(Utc::now()).unwrap();
        let issue = NewIssue::titled("I")
            .in_project(project.id)
            .build(1, Utc::now())
            .unwrap();
        Dataset {
            projects: vec![project],
            issues: vec![issue],
            ..Default::default()
        }
    }

    #[test]
    fn consistent_dataset_has_no_warnings() {
        let mut data = dataset_with_issue();
        assert!(reconcile(&mut data, true).unwrap().is_empty());
    }

    #[test]
    fn strict_mode_rejects_dangling_project() {
        let mut data = dataset_with_issue();
        data.projects.clear();
        let err = reconcile(&mut data, true).unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: EntityKind::Project, .. }));
    }

    #[test]
    fn lenient_mode_drops_orphan_comment() {
        let mut data = dataset_with_issue();
        let comment = NewComment {
            issue: IssueId::new(),
            content: "orphan".into(),
            is_ai_generated: false,
        }
        .build(Utc::now())
        .unwrap();
        data.comments.push(comment);

        let warnings = reconcile(&mut data, false).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(data.comments.is_empty());
    }

    #[test]
    fn lenient_mode_renumbers_clash() {
        let mut data = dataset_with_issue();
        let mut twin = data.issues[0].clone();
        twin.id = IssueId::new();
        data.issues.push(twin);

        let warnings = reconcile(&mut data, false).unwrap();
        assert!(matches!(
            warnings[..],
            [LoadWarning::RenumberedIssue { from: 1, to: 2, .. }]
        ));
        assert_eq!(data.issues[1].issue_number, 2);
    }

    #[test]
    fn strict_mode_rejects_duplicate_ids() {
        let mut data = dataset_with_issue();
        data.projects.push(data.projects[0].clone());
        let err = reconcile(&mut data, true).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { kind: EntityKind::Project, .. }));
    }

    #[test]
    fn lenient_mode_breaks_parent_loop() {
        let mut data = dataset_with_issue();
        let mut second = data.issues[0].clone();
        second.id = IssueId::new();
        second.issue_number = 2;
        second.parent = Some(data.issues[0].id);
        data.issues[0].parent = Some(second.id);
        data.issues.push(second);

        let warnings = reconcile(&mut data, false).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(data.issues.iter().filter(|i| i.parent.is_some()).count() == 1);
    }
}
