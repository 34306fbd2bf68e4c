//! Command execution logic.
//!
//! Every mutating command ends with [`App::commit`] so the change reaches
//! disk; a command that fails part-way never commits.

use anyhow::{Context, Result};
use chrono::Utc;

use super::args::{
    AiAction, AiArgs, AiSnapshotArgs, AiTrackArgs, CycleAction, CycleArgs, CycleCreateArgs,
    InitArgs, IssueAction, IssueArgs, IssueCreateArgs, IssueListArgs, IssueUpdateArgs,
    LabelAction, ProjectAction, ProjectArgs,
};
use crate::app::App;
use crate::domain::{
    AiTool, CycleUpdate, EntityKind, Issue, IssueId, IssueUpdate, NewAiEvent, NewComment,
    NewContextSnapshot, NewCycle, NewIssue, NewLabel, NewProject, ProjectId, ProjectUpdate,
};
use crate::error::Error;
use crate::output::{self, IssueDetails, OutputMode};
use crate::query::{IssueQuery, group_by_status};

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;
    let result = init::init(&current_dir).await?;

    if !args.quiet {
        println!("Initialized flowdeck in {}", result.flowdeck_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Store:  {}", result.store_file.display());
    }

    Ok(())
}

async fn resolve_optional_project(app: &App, input: Option<&str>) -> Result<Option<ProjectId>> {
    match input {
        Some(input) => Ok(Some(app.resolve_project(input).await?)),
        None => Ok(None),
    }
}

async fn resolve_optional_issue(app: &App, input: Option<&str>) -> Result<Option<IssueId>> {
    match input {
        Some(input) => Ok(Some(app.resolve_issue(input).await?)),
        None => Ok(None),
    }
}

async fn require_issue(app: &App, id: &IssueId) -> Result<Issue> {
    Ok(app
        .storage()
        .get_issue(id)
        .await?
        .ok_or_else(|| Error::not_found(EntityKind::Issue, id))?)
}

fn print_issue_result(verb: &str, issue: &Issue, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => output::print_json(issue)?,
        OutputMode::Text => {
            output::print_message(&format!("{verb} {}: {}", issue.reference(), issue.title))?;
        }
    }
    Ok(())
}

// ============================================================================
// Projects
// ============================================================================

/// Execute a `project` subcommand
pub async fn execute_project(app: &mut App, args: &ProjectArgs, mode: OutputMode) -> Result<()> {
    match &args.action {
        ProjectAction::Create {
            name,
            description,
            icon,
            color,
        } => {
            let project = app
                .storage_mut()
                .create_project(NewProject {
                    name: name.clone(),
                    description: description.clone(),
                    icon: icon.clone(),
                    color: color.clone(),
                })
                .await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&project)?,
                OutputMode::Text => output::print_message(&format!(
                    "Created project {} ({})",
                    project.name, project.id
                ))?,
            }
        }
        ProjectAction::List { search } => {
            let projects = app.storage().list_projects(search.as_deref()).await?;
            output::print_projects(&projects, mode)?;
        }
        ProjectAction::Show { project } => {
            let id = app.resolve_project(project).await?;
            let project = app
                .storage()
                .get_project(&id)
                .await?
                .ok_or_else(|| Error::not_found(EntityKind::Project, id))?;
            let stats = app.storage().project_stats(&id).await?;
            output::print_project_details(&project, &stats, mode)?;
        }
        ProjectAction::Update {
            project,
            name,
            description,
            icon,
            color,
        } => {
            let id = app.resolve_project(project).await?;
            let updates = ProjectUpdate {
                name: name.clone(),
                description: description.clone(),
                icon: icon.clone(),
                color: color.clone(),
            };
            let project = app.storage_mut().update_project(&id, updates).await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&project)?,
                OutputMode::Text => {
                    output::print_message(&format!("Updated project {}", project.name))?;
                }
            }
        }
        ProjectAction::Delete { project } => {
            let id = app.resolve_project(project).await?;
            let summary = app.storage_mut().delete_project(&id).await?;
            app.commit().await?;
            output::print_delete_summary(&summary, mode)?;
        }
    }
    Ok(())
}

// ============================================================================
// Issues
// ============================================================================

/// Execute an `issue` subcommand
pub async fn execute_issue(app: &mut App, args: &IssueArgs, mode: OutputMode) -> Result<()> {
    match &args.action {
        IssueAction::Create(create) => execute_issue_create(app, create, mode).await,
        IssueAction::List(list) => execute_issue_list(app, list, mode).await,
        IssueAction::Show { issue } => execute_issue_show(app, issue, mode).await,
        IssueAction::Status { issue, status } => {
            let id = app.resolve_issue(issue).await?;
            let issue = app.storage_mut().change_status(&id, (*status).into()).await?;
            app.commit().await?;
            print_issue_result("Moved", &issue, mode)
        }
        IssueAction::Update(update) => execute_issue_update(app, update, mode).await,
        IssueAction::Delete { issues } => {
            let mut ids = Vec::with_capacity(issues.len());
            for input in issues {
                ids.push(app.resolve_issue(input).await?);
            }
            let summary = app.storage_mut().delete_issues(&ids).await?;
            app.commit().await?;
            output::print_delete_summary(&summary, mode)?;
            Ok(())
        }
        IssueAction::Comment { issue, content, ai } => {
            let id = app.resolve_issue(issue).await?;
            let comment = app
                .storage_mut()
                .add_comment(NewComment {
                    issue: id,
                    content: content.clone(),
                    is_ai_generated: *ai,
                })
                .await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&comment)?,
                OutputMode::Text => output::print_message("Comment added")?,
            }
            Ok(())
        }
        IssueAction::Label { action } => execute_label(app, action, mode).await,
    }
}

async fn execute_issue_create(
    app: &mut App,
    args: &IssueCreateArgs,
    mode: OutputMode,
) -> Result<()> {
    let project = resolve_optional_project(app, args.project.as_deref()).await?;
    let parent = resolve_optional_issue(app, args.parent.as_deref()).await?;

    let mut labels = Vec::with_capacity(args.labels.len());
    for label in &args.labels {
        labels.push(app.resolve_label(label, project.as_ref()).await?);
    }

    let new_issue = NewIssue {
        title: args.title.clone(),
        description: args.description.clone(),
        status: args.status.into(),
        priority: args.priority.into(),
        issue_type: args.issue_type.into(),
        estimated_hours: args.estimate,
        project,
        parent,
        labels,
        is_ai_generated: args.ai_tool.is_some(),
        ai_tool_used: args
            .ai_tool
            .map(|tool| AiTool::from(tool).as_str().to_string()),
    };

    let issue = app.storage_mut().create_issue(new_issue).await?;
    app.commit().await?;

    print_issue_result("Created", &issue, mode)
}

async fn execute_issue_list(app: &App, args: &IssueListArgs, mode: OutputMode) -> Result<()> {
    let project = resolve_optional_project(app, args.project.as_deref()).await?;
    let cycle = match &args.cycle {
        Some(cycle) => Some(app.resolve_cycle(cycle).await?),
        None => None,
    };
    let label = match &args.label {
        Some(label) => Some(app.resolve_label(label, project.as_ref()).await?),
        None => None,
    };

    let query = IssueQuery {
        project,
        status: args.status.map(Into::into),
        priority: args.priority.map(Into::into),
        issue_type: args.issue_type.map(Into::into),
        cycle,
        label,
        only_ai_generated: args.ai,
        search_text: args.search.clone(),
        sort: args.sort.into(),
        limit: args.limit,
    };

    let issues = app.storage().fetch_issues(&query).await?;
    let labels = app.storage().list_labels(None).await?;

    if args.grouped {
        output::print_status_groups(&group_by_status(&issues), &labels, mode)?;
    } else {
        output::print_issues(&issues, &labels, mode)?;
    }
    Ok(())
}

async fn execute_issue_show(app: &App, input: &str, mode: OutputMode) -> Result<()> {
    let id = app.resolve_issue(input).await?;
    let issue = require_issue(app, &id).await?;

    let labels = app
        .storage()
        .list_labels(None)
        .await?
        .into_iter()
        .filter(|label| issue.labels.contains(&label.id))
        .collect();
    let comments = app.storage().list_comments(&id).await?;
    let subtasks = app.storage().subtasks(&id).await?;
    let parent = match &issue.parent {
        Some(parent) => app.storage().get_issue(parent).await?,
        None => None,
    };

    let details = IssueDetails {
        issue,
        labels,
        comments,
        subtasks,
        parent,
    };
    output::print_issue_details(&details, mode)?;
    Ok(())
}

async fn execute_issue_update(
    app: &mut App,
    args: &IssueUpdateArgs,
    mode: OutputMode,
) -> Result<()> {
    let id = app.resolve_issue(&args.issue).await?;

    let project = if args.no_project {
        Some(None)
    } else {
        resolve_optional_project(app, args.project.as_deref())
            .await?
            .map(Some)
    };
    let parent = if args.no_parent {
        Some(None)
    } else {
        resolve_optional_issue(app, args.parent.as_deref())
            .await?
            .map(Some)
    };

    if let Some(parent) = parent {
        app.storage_mut().set_parent(&id, parent.as_ref()).await?;
    }

    let updates = IssueUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        status: args.status.map(Into::into),
        priority: args.priority.map(Into::into),
        issue_type: args.issue_type.map(Into::into),
        estimated_hours: args.estimate.map(Some),
        actual_hours: args.actual.map(Some),
        project,
    };
    let issue = app.storage_mut().update_issue(&id, updates).await?;
    app.commit().await?;

    print_issue_result("Updated", &issue, mode)
}

async fn execute_label(app: &mut App, action: &LabelAction, mode: OutputMode) -> Result<()> {
    match action {
        LabelAction::Add { issue, label } | LabelAction::Remove { issue, label } => {
            let issue_id = app.resolve_issue(issue).await?;
            let project = require_issue(app, &issue_id).await?.project;
            let label_id = app.resolve_label(label, project.as_ref()).await?;

            let (verb, issue) = if matches!(action, LabelAction::Add { .. }) {
                let issue = app
                    .storage_mut()
                    .add_label_to_issue(&issue_id, &label_id)
                    .await?;
                ("Labeled", issue)
            } else {
                let issue = app
                    .storage_mut()
                    .remove_label_from_issue(&issue_id, &label_id)
                    .await?;
                ("Unlabeled", issue)
            };
            app.commit().await?;
            print_issue_result(verb, &issue, mode)
        }
        LabelAction::List { project } => {
            let project = resolve_optional_project(app, project.as_deref()).await?;
            let labels = app.storage().list_labels(project.as_ref()).await?;
            output::print_labels(&labels, mode)?;
            Ok(())
        }
        LabelAction::Create {
            name,
            color,
            project,
        } => {
            let project = resolve_optional_project(app, project.as_deref()).await?;
            let label = app
                .storage_mut()
                .create_label(NewLabel {
                    name: name.clone(),
                    color: color.clone(),
                    icon: None,
                    project,
                })
                .await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&label)?,
                OutputMode::Text => {
                    output::print_message(&format!("Created label {} ({})", label.name, label.id))?;
                }
            }
            Ok(())
        }
        LabelAction::Delete { label, project } => {
            let project = resolve_optional_project(app, project.as_deref()).await?;
            let id = app.resolve_label(label, project.as_ref()).await?;
            app.storage_mut().delete_label(&id).await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&serde_json::json!({ "deleted": id }))?,
                OutputMode::Text => output::print_message("Label deleted")?,
            }
            Ok(())
        }
    }
}

// ============================================================================
// Cycles
// ============================================================================

/// Execute a `cycle` subcommand
pub async fn execute_cycle(app: &mut App, args: &CycleArgs, mode: OutputMode) -> Result<()> {
    let now = Utc::now();
    match &args.action {
        CycleAction::Create(create) => execute_cycle_create(app, create, mode).await,
        CycleAction::List {
            project,
            active,
            upcoming,
        } => {
            let project = resolve_optional_project(app, project.as_deref()).await?;
            let mut cycles = if *active {
                app.storage().active_cycles(now).await?
            } else if *upcoming {
                app.storage().upcoming_cycles(now).await?
            } else {
                app.storage().list_cycles(project.as_ref()).await?
            };
            if project.is_some() {
                cycles.retain(|cycle| cycle.project == project);
            }
            output::print_cycles(&cycles, now, mode)?;
            Ok(())
        }
        CycleAction::Show { cycle } => {
            let id = app.resolve_cycle(cycle).await?;
            let cycle = app
                .storage()
                .get_cycle(&id)
                .await?
                .ok_or_else(|| Error::not_found(EntityKind::Cycle, id))?;
            let stats = app.storage().cycle_stats(&id).await?;
            let issues = app.storage().cycle_issues(&id).await?;
            output::print_cycle_details(&cycle, &stats, &issues, now, mode)?;
            Ok(())
        }
        CycleAction::Update {
            cycle,
            name,
            description,
            start,
            end,
            capacity,
            points,
        } => {
            let id = app.resolve_cycle(cycle).await?;
            let updates = CycleUpdate {
                name: name.clone(),
                description: description.clone(),
                start_date: *start,
                end_date: *end,
                total_capacity: *capacity,
                planned_points: *points,
            };
            let cycle = app.storage_mut().update_cycle(&id, updates).await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&cycle)?,
                OutputMode::Text => {
                    output::print_message(&format!("Updated cycle {}", cycle.name))?;
                }
            }
            Ok(())
        }
        CycleAction::Archive { cycle } => {
            let id = app.resolve_cycle(cycle).await?;
            let cycle = app.storage_mut().archive_cycle(&id).await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&cycle)?,
                OutputMode::Text => {
                    output::print_message(&format!("Archived cycle {}", cycle.name))?;
                }
            }
            Ok(())
        }
        CycleAction::Assign { issue, cycle } => {
            let issue_id = app.resolve_issue(issue).await?;
            let cycle_id = app.resolve_cycle(cycle).await?;
            let issue = app
                .storage_mut()
                .assign_issue_to_cycle(&issue_id, &cycle_id)
                .await?;
            app.commit().await?;
            print_issue_result("Planned", &issue, mode)
        }
        CycleAction::Unassign { issue } => {
            let id = app.resolve_issue(issue).await?;
            let issue = app.storage_mut().remove_issue_from_cycle(&id).await?;
            app.commit().await?;
            print_issue_result("Unplanned", &issue, mode)
        }
        CycleAction::Delete { cycle } => {
            let id = app.resolve_cycle(cycle).await?;
            app.storage_mut().delete_cycle(&id).await?;
            app.commit().await?;

            match mode {
                OutputMode::Json => output::print_json(&serde_json::json!({ "deleted": id }))?,
                OutputMode::Text => output::print_message("Cycle deleted")?,
            }
            Ok(())
        }
    }
}

async fn execute_cycle_create(
    app: &mut App,
    args: &CycleCreateArgs,
    mode: OutputMode,
) -> Result<()> {
    let now = Utc::now();
    let default_capacity = app.config().defaults.cycle_capacity;

    let mut new_cycle = if args.week {
        let mut cycle = NewCycle::current_week(now);
        cycle.total_capacity = default_capacity;
        cycle
    } else if args.sprint {
        NewCycle::two_week_sprint(now)
    } else {
        let (Some(start), Some(end)) = (args.start, args.end) else {
            anyhow::bail!("Specify --week, --sprint, or both --start and --end");
        };
        let name = args
            .name
            .clone()
            .context("--name is required for a cycle with explicit dates")?;
        let mut cycle = NewCycle::new(name, start, end);
        cycle.total_capacity = default_capacity;
        cycle
    };

    if let Some(name) = &args.name {
        new_cycle.name.clone_from(name);
    }
    if let Some(capacity) = args.capacity {
        new_cycle.total_capacity = capacity;
    }
    if let Some(points) = args.points {
        new_cycle.planned_points = points;
    }
    new_cycle.description.clone_from(&args.description);

    let project = resolve_optional_project(app, args.project.as_deref()).await?;
    let cycle = app
        .storage_mut()
        .create_cycle(new_cycle.in_project(project))
        .await?;
    app.commit().await?;

    match mode {
        OutputMode::Json => output::print_json(&cycle)?,
        OutputMode::Text => output::print_message(&format!(
            "Created cycle {} ({} .. {})",
            cycle.name,
            cycle.start_date.format("%Y-%m-%d"),
            cycle.end_date.format("%Y-%m-%d")
        ))?,
    }
    Ok(())
}

// ============================================================================
// AI tracking
// ============================================================================

/// Execute an `ai` subcommand
pub async fn execute_ai(app: &mut App, args: &AiArgs, mode: OutputMode) -> Result<()> {
    match &args.action {
        AiAction::Track(track) => execute_ai_track(app, track, mode).await,
        AiAction::Snapshot(snapshot) => execute_ai_snapshot(app, snapshot, mode).await,
        AiAction::Events { issue, limit } => {
            let issue = resolve_optional_issue(app, issue.as_deref()).await?;
            let events = app.storage().ai_events(issue.as_ref(), *limit).await?;
            output::print_ai_events(&events, mode)?;
            Ok(())
        }
        AiAction::Stats => {
            let stats = app.storage().ai_stats(Utc::now()).await?;
            output::print_ai_stats(&stats, mode)?;
            Ok(())
        }
    }
}

async fn execute_ai_track(app: &mut App, args: &AiTrackArgs, mode: OutputMode) -> Result<()> {
    let issue = resolve_optional_issue(app, args.issue.as_deref()).await?;
    let event = app
        .storage_mut()
        .track_ai_event(NewAiEvent {
            event_type: args.event_type.clone(),
            ai_tool: AiTool::from(args.tool).as_str().to_string(),
            prompt_summary: args.summary.clone(),
            files_changed: args.files.clone(),
            tokens_used: args.tokens,
            issue,
        })
        .await?;
    app.commit().await?;

    match mode {
        OutputMode::Json => output::print_json(&event)?,
        OutputMode::Text => output::print_message(&format!(
            "Tracked {} event from {}",
            event.event_type,
            event.tool().display_name()
        ))?,
    }
    Ok(())
}

async fn execute_ai_snapshot(app: &mut App, args: &AiSnapshotArgs, mode: OutputMode) -> Result<()> {
    let issue = resolve_optional_issue(app, args.issue.as_deref()).await?;

    if args.list {
        let issue = issue.context("--list requires --issue")?;
        let snapshots = app.storage().context_snapshots(&issue).await?;
        output::print_snapshots(&snapshots, mode)?;
        return Ok(());
    }

    let completion = args
        .completion
        .context("a completion percentage is required")?;
    let snapshot = app
        .storage_mut()
        .save_context_snapshot(NewContextSnapshot {
            completion_percentage: completion,
            key_files: args.files.clone(),
            pending_items: args.pending.clone(),
            notes: args.notes.clone(),
            issue,
        })
        .await?;
    app.commit().await?;

    match mode {
        OutputMode::Json => output::print_json(&snapshot)?,
        OutputMode::Text => output::print_message(&format!(
            "Saved snapshot at {:.0}% complete",
            snapshot.completion_percentage
        ))?,
    }
    Ok(())
}
