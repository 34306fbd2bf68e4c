//! Output formatting for CLI commands.
//!
//! Every view renders either as human-readable text or as JSON for
//! programmatic use. Text renderers write to any [`Write`] so they can be
//! tested against a buffer.
//!
//! Submodules:
//! - [`color`]: Color and styling helpers

pub mod color;

use crate::domain::{
    AiTrackingEvent, Comment, ContextSnapshot, Cycle, Issue, IssueLabel, LabelId, Project,
};
use crate::query::StatusGroup;
use crate::stats::{AiStats, CycleStats, ProjectStats};
use crate::storage::DeleteSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::env;
use std::io::{self, Write};

pub use color::{error, info, success, warning};

use color::{
    bold, colorize_label, colorize_priority, colorize_reference, colorize_status, dimmed,
    status_icon,
};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_colors: bool) -> Self {
        Self {
            max_width,
            use_colors,
        }
    }

    /// Create an `OutputConfig` by reading from environment variables.
    ///
    /// Reads:
    /// - `FLOWDECK_MAX_WIDTH`: Maximum content width (default: 100)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `FLOWDECK_COLOR`: Set to "0" or "false" to disable colors (default: true)
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = match env::var("FLOWDECK_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => match s.parse() {
                Ok(width) => width,
                Err(_) => {
                    tracing::warn!(
                        env_var = "FLOWDECK_MAX_WIDTH",
                        value = %s,
                        default = DEFAULT_MAX_CONTENT_WIDTH,
                        "Invalid value, using default"
                    );
                    DEFAULT_MAX_CONTENT_WIDTH
                }
            },
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        // https://no-color.org/
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("FLOWDECK_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width,
            use_colors,
        }
    }

    fn content_width(&self) -> usize {
        terminal_width().min(self.max_width)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_CONTENT_WIDTH,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

/// Wrap text to the given width, preserving paragraph breaks.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(20))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}

fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.trim().is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, config.content_width().saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

fn with_stdout<F>(f: F) -> io::Result<()>
where
    F: FnOnce(&mut io::StdoutLock<'static>, &OutputConfig) -> io::Result<()>,
{
    let mut handle = io::stdout().lock();
    let config = OutputConfig::from_env();
    f(&mut handle, &config)
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{text}")
}

// ============================================================================
// Public Dispatch Functions
// ============================================================================

/// Print a simple message
pub fn print_message(msg: &str) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    writeln!(handle, "{msg}")
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut handle = io::stdout().lock();
    write_json(&mut handle, value)
}

/// Print a list of projects
pub fn print_projects(projects: &[Project], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(projects),
        OutputMode::Text => with_stdout(|w, config| write_projects(w, projects, config)),
    }
}

/// Print a project with its statistics
pub fn print_project_details(
    project: &Project,
    stats: &ProjectStats,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&json!({
            "project": project,
            "stats": stats,
            "completion_rate": stats.completion_rate(),
        })),
        OutputMode::Text => {
            with_stdout(|w, config| write_project_details(w, project, stats, config))
        }
    }
}

/// Print a list of issues; `labels` is used to resolve label names
pub fn print_issues(issues: &[Issue], labels: &[IssueLabel], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(issues),
        OutputMode::Text => with_stdout(|w, config| write_issues(w, issues, labels, config)),
    }
}

/// Print issues grouped by status
pub fn print_status_groups(
    groups: &[StatusGroup],
    labels: &[IssueLabel],
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(groups),
        OutputMode::Text => with_stdout(|w, config| write_status_groups(w, groups, labels, config)),
    }
}

/// Everything shown by `issue show`
#[derive(Debug, Clone, Serialize)]
pub struct IssueDetails {
    /// The issue
    pub issue: Issue,
    /// Its labels, resolved
    pub labels: Vec<IssueLabel>,
    /// Comments, oldest first
    pub comments: Vec<Comment>,
    /// Direct children
    pub subtasks: Vec<Issue>,
    /// Parent issue, when set
    pub parent: Option<Issue>,
}

/// Print an issue with full details
pub fn print_issue_details(details: &IssueDetails, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(details),
        OutputMode::Text => with_stdout(|w, config| write_issue_details(w, details, config)),
    }
}

/// Print a list of labels
pub fn print_labels(labels: &[IssueLabel], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(labels),
        OutputMode::Text => with_stdout(|w, config| write_labels(w, labels, config)),
    }
}

/// Print a list of cycles as of `now`
pub fn print_cycles(cycles: &[Cycle], now: DateTime<Utc>, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(cycles),
        OutputMode::Text => with_stdout(|w, config| write_cycles(w, cycles, now, config)),
    }
}

/// Print a cycle with its statistics and issues
pub fn print_cycle_details(
    cycle: &Cycle,
    stats: &CycleStats,
    issues: &[Issue],
    now: DateTime<Utc>,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(&json!({
            "cycle": cycle,
            "stats": stats,
            "completion_rate": stats.completion_rate(),
            "capacity_used": stats.capacity_used(),
            "velocity": stats.velocity(),
            "days_remaining": cycle.days_remaining_at(now),
            "issues": issues,
        })),
        OutputMode::Text => {
            with_stdout(|w, config| write_cycle_details(w, cycle, stats, issues, now, config))
        }
    }
}

/// Print AI tracking events
pub fn print_ai_events(events: &[AiTrackingEvent], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(events),
        OutputMode::Text => with_stdout(|w, config| write_ai_events(w, events, config)),
    }
}

/// Print context snapshots
pub fn print_snapshots(snapshots: &[ContextSnapshot], mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(snapshots),
        OutputMode::Text => with_stdout(|w, config| write_snapshots(w, snapshots, config)),
    }
}

/// Print today's AI activity
pub fn print_ai_stats(stats: &AiStats, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(stats),
        OutputMode::Text => with_stdout(|w, config| write_ai_stats(w, stats, config)),
    }
}

/// Print what a delete removed
pub fn print_delete_summary(summary: &DeleteSummary, mode: OutputMode) -> io::Result<()> {
    match mode {
        OutputMode::Json => print_json(summary),
        OutputMode::Text => with_stdout(|w, config| write_delete_summary(w, summary, config)),
    }
}

// ============================================================================
// Text Formatting
// ============================================================================

fn write_projects<W: Write>(
    w: &mut W,
    projects: &[Project],
    config: &OutputConfig,
) -> io::Result<()> {
    if projects.is_empty() {
        writeln!(w, "No projects found.")?;
        return Ok(());
    }

    for project in projects {
        writeln!(
            w,
            "{}  {}  {}",
            dimmed(&short_id(project.id), config),
            bold(&project.name, config),
            dimmed(&project.updated_at.format(DATE_FORMAT).to_string(), config)
        )?;
    }
    Ok(())
}

fn write_project_details<W: Write>(
    w: &mut W,
    project: &Project,
    stats: &ProjectStats,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{} {}", bold(&project.name, config), dimmed(&project.id.to_string(), config))?;
    writeln!(
        w,
        "{} {}    {} #{}",
        dimmed("Icon:", config),
        project.icon,
        dimmed("Color:", config),
        project.color
    )?;
    print_text_section(w, "Description", &project.description, config)?;

    writeln!(w)?;
    writeln!(
        w,
        "{} {} total, {} done, {} in progress, {} in review, {} backlog",
        bold("Issues:", config),
        stats.total,
        success(&stats.completed.to_string(), config),
        stats.in_progress,
        stats.in_review,
        stats.backlog
    )?;
    writeln!(
        w,
        "{} {:.1}%    {} {}",
        dimmed("Completion:", config),
        stats.completion_rate(),
        dimmed("AI-generated:", config),
        stats.ai_generated
    )?;
    Ok(())
}

fn label_names(labels: &[IssueLabel]) -> HashMap<LabelId, &IssueLabel> {
    labels.iter().map(|label| (label.id, label)).collect()
}

fn write_issue_line<W: Write>(
    w: &mut W,
    issue: &Issue,
    labels: &HashMap<LabelId, &IssueLabel>,
    config: &OutputConfig,
) -> io::Result<()> {
    let mut line = format!(
        "{} {:>5}  {:<6}  {}",
        status_icon(issue.status, config),
        colorize_reference(&issue.reference(), config),
        colorize_priority(issue.priority, config),
        issue.title
    );
    let names: Vec<String> = issue
        .labels
        .iter()
        .filter_map(|id| labels.get(id))
        .map(|label| colorize_label(&label.name, &label.color, config))
        .collect();
    if !names.is_empty() {
        line.push_str("  ");
        line.push_str(&names.join(", "));
    }
    if issue.is_ai_generated {
        line.push_str("  ");
        line.push_str(&info("[ai]", config));
    }
    writeln!(w, "{line}")
}

fn write_issues<W: Write>(
    w: &mut W,
    issues: &[Issue],
    labels: &[IssueLabel],
    config: &OutputConfig,
) -> io::Result<()> {
    if issues.is_empty() {
        writeln!(w, "No issues found.")?;
        return Ok(());
    }

    let labels = label_names(labels);
    writeln!(w, "Found {} issue(s):", issues.len())?;
    writeln!(w)?;
    for issue in issues {
        write_issue_line(w, issue, &labels, config)?;
    }
    Ok(())
}

fn write_status_groups<W: Write>(
    w: &mut W,
    groups: &[StatusGroup],
    labels: &[IssueLabel],
    config: &OutputConfig,
) -> io::Result<()> {
    if groups.is_empty() {
        writeln!(w, "No issues found.")?;
        return Ok(());
    }

    let labels = label_names(labels);
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        writeln!(
            w,
            "{} ({})",
            bold(&colorize_status(group.status, config), config),
            group.issues.len()
        )?;
        for issue in &group.issues {
            write!(w, "  ")?;
            write_issue_line(w, issue, &labels, config)?;
        }
    }
    Ok(())
}

fn write_issue_details<W: Write>(
    w: &mut W,
    details: &IssueDetails,
    config: &OutputConfig,
) -> io::Result<()> {
    let issue = &details.issue;

    writeln!(
        w,
        "{} {}: {}",
        status_icon(issue.status, config),
        colorize_reference(&issue.reference(), config),
        bold(&issue.title, config)
    )?;
    writeln!(w, "{} {}", dimmed("Id:", config), issue.id)?;
    writeln!(
        w,
        "{} {}    {} {}    {} {}",
        dimmed("Type:", config),
        issue.issue_type,
        dimmed("Status:", config),
        colorize_status(issue.status, config),
        dimmed("Priority:", config),
        colorize_priority(issue.priority, config)
    )?;

    if issue.estimated_hours.is_some() || issue.actual_hours.is_some() {
        let hours = |h: Option<f64>| h.map_or_else(|| "-".to_string(), |h| format!("{h:.1}h"));
        writeln!(
            w,
            "{} {}    {} {}",
            dimmed("Estimate:", config),
            hours(issue.estimated_hours),
            dimmed("Actual:", config),
            hours(issue.actual_hours)
        )?;
    }

    if !details.labels.is_empty() {
        let names: Vec<String> = details
            .labels
            .iter()
            .map(|label| colorize_label(&label.name, &label.color, config))
            .collect();
        writeln!(w, "{} {}", dimmed("Labels:", config), names.join(", "))?;
    }

    if let Some(parent) = &details.parent {
        writeln!(
            w,
            "{} {} {}",
            dimmed("Parent:", config),
            colorize_reference(&parent.reference(), config),
            parent.title
        )?;
    }

    if issue.is_ai_generated {
        writeln!(
            w,
            "{} {} ({} generations, {} tokens)",
            dimmed("AI:", config),
            issue.ai_tool_used.as_deref().unwrap_or("unknown"),
            issue.ai_generation_count,
            issue.ai_context_tokens
        )?;
    }

    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Created:", config),
        issue.created_at.format(DATE_FORMAT),
        dimmed("Updated:", config),
        issue.updated_at.format(DATE_FORMAT)
    )?;

    print_text_section(w, "Description", &issue.description, config)?;

    if !details.subtasks.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Subtasks", config), details.subtasks.len())?;
        for subtask in &details.subtasks {
            writeln!(
                w,
                "  {} {} {}",
                status_icon(subtask.status, config),
                colorize_reference(&subtask.reference(), config),
                subtask.title
            )?;
        }
    }

    if !details.comments.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Comments", config), details.comments.len())?;
        let width = config.content_width().saturating_sub(4);
        for comment in &details.comments {
            let author = if comment.is_ai_generated { " [ai]" } else { "" };
            writeln!(
                w,
                "  {}{}",
                dimmed(&comment.created_at.format(DATE_FORMAT).to_string(), config),
                info(author, config)
            )?;
            for line in wrap_text(&comment.content, width) {
                writeln!(w, "    {line}")?;
            }
        }
    }

    Ok(())
}

fn write_labels<W: Write>(
    w: &mut W,
    labels: &[IssueLabel],
    config: &OutputConfig,
) -> io::Result<()> {
    if labels.is_empty() {
        writeln!(w, "No labels found.")?;
        return Ok(());
    }

    for label in labels {
        let scope = if label.project.is_some() { "" } else { " (global)" };
        writeln!(
            w,
            "{}  {}  {}{}",
            dimmed(&short_id(label.id), config),
            colorize_label(&label.name, &label.color, config),
            dimmed(&format!("#{}", label.color), config),
            dimmed(scope, config)
        )?;
    }
    Ok(())
}

fn write_cycles<W: Write>(
    w: &mut W,
    cycles: &[Cycle],
    now: DateTime<Utc>,
    config: &OutputConfig,
) -> io::Result<()> {
    if cycles.is_empty() {
        writeln!(w, "No cycles found.")?;
        return Ok(());
    }

    for cycle in cycles {
        let state = if cycle.is_archived {
            dimmed("archived", config)
        } else if cycle.is_active_at(now) {
            success("active", config)
        } else if cycle.start_date > now {
            info("upcoming", config)
        } else {
            dimmed("ended", config)
        };
        writeln!(
            w,
            "{}  {}  {} .. {}  {}",
            dimmed(&short_id(cycle.id), config),
            bold(&cycle.name, config),
            cycle.start_date.format("%Y-%m-%d"),
            cycle.end_date.format("%Y-%m-%d"),
            state
        )?;
    }
    Ok(())
}

fn write_cycle_details<W: Write>(
    w: &mut W,
    cycle: &Cycle,
    stats: &CycleStats,
    issues: &[Issue],
    now: DateTime<Utc>,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{} {}", bold(&cycle.name, config), dimmed(&cycle.id.to_string(), config))?;
    writeln!(
        w,
        "{} {} .. {}",
        dimmed("Dates:", config),
        cycle.start_date.format(DATE_FORMAT),
        cycle.end_date.format(DATE_FORMAT)
    )?;

    let days = cycle.days_remaining_at(now);
    let remaining = if days < 0 {
        warning(&format!("{} day(s) overdue", -days), config)
    } else {
        format!("{days} day(s)")
    };
    writeln!(w, "{} {}", dimmed("Remaining:", config), remaining)?;
    print_text_section(w, "Description", &cycle.description, config)?;

    writeln!(w)?;
    writeln!(
        w,
        "{} {}/{} done ({:.0}%), {} in progress, {} in review, {} not started",
        bold("Progress:", config),
        stats.completed,
        stats.total,
        stats.completion_rate(),
        stats.in_progress,
        stats.in_review,
        stats.backlog
    )?;
    writeln!(
        w,
        "{} {:.1}h estimated of {:.1}h ({:.0}%), {:.1}h actual    {} {}",
        dimmed("Capacity:", config),
        stats.estimated_hours,
        stats.capacity,
        stats.capacity_used(),
        stats.actual_hours,
        dimmed("Velocity:", config),
        stats.velocity()
    )?;

    if !issues.is_empty() {
        writeln!(w)?;
        let labels = HashMap::new();
        for issue in issues {
            write_issue_line(w, issue, &labels, config)?;
        }
    }
    Ok(())
}

fn write_ai_events<W: Write>(
    w: &mut W,
    events: &[AiTrackingEvent],
    config: &OutputConfig,
) -> io::Result<()> {
    if events.is_empty() {
        writeln!(w, "No AI events recorded.")?;
        return Ok(());
    }

    for event in events {
        writeln!(
            w,
            "{}  {}  {}  {} tokens",
            dimmed(&event.timestamp.format(DATE_FORMAT).to_string(), config),
            info(event.tool().display_name(), config),
            event.event_type,
            event.tokens_used
        )?;
        if !event.prompt_summary.is_empty() {
            writeln!(w, "    {}", event.prompt_summary)?;
        }
        if !event.files_changed.is_empty() {
            writeln!(w, "    {} {}", dimmed("Files:", config), event.files_changed.join(", "))?;
        }
    }
    Ok(())
}

fn write_snapshots<W: Write>(
    w: &mut W,
    snapshots: &[ContextSnapshot],
    config: &OutputConfig,
) -> io::Result<()> {
    if snapshots.is_empty() {
        writeln!(w, "No context snapshots saved.")?;
        return Ok(());
    }

    for snapshot in snapshots {
        writeln!(
            w,
            "{}  {:.0}% complete",
            dimmed(&snapshot.timestamp.format(DATE_FORMAT).to_string(), config),
            snapshot.completion_percentage
        )?;
        if !snapshot.key_files.is_empty() {
            writeln!(w, "    {} {}", dimmed("Files:", config), snapshot.key_files.join(", "))?;
        }
        for item in &snapshot.pending_items {
            writeln!(w, "    - {item}")?;
        }
        if !snapshot.notes.is_empty() {
            for line in wrap_text(&snapshot.notes, config.content_width().saturating_sub(4)) {
                writeln!(w, "    {line}")?;
            }
        }
    }
    Ok(())
}

fn write_ai_stats<W: Write>(w: &mut W, stats: &AiStats, config: &OutputConfig) -> io::Result<()> {
    writeln!(w, "{}", bold("AI activity today", config))?;
    writeln!(w, "{} {}", dimmed("Interactions:", config), stats.today_interactions)?;
    writeln!(w, "{} {}", dimmed("Tokens:", config), stats.today_tokens)?;
    writeln!(
        w,
        "{} {}",
        dimmed("Most used:", config),
        stats.most_used_tool.map_or("-", |tool| tool.display_name())
    )?;
    writeln!(
        w,
        "{} {:.1}% of issues",
        dimmed("AI-generated:", config),
        stats.ai_generation_rate
    )?;
    Ok(())
}

fn write_delete_summary<W: Write>(
    w: &mut W,
    summary: &DeleteSummary,
    config: &OutputConfig,
) -> io::Result<()> {
    let mut parts = Vec::new();
    if summary.projects > 0 {
        parts.push(format!("{} project(s)", summary.projects));
    }
    parts.push(format!("{} issue(s)", summary.issues));
    if summary.comments > 0 {
        parts.push(format!("{} comment(s)", summary.comments));
    }
    if summary.labels > 0 {
        parts.push(format!("{} label(s)", summary.labels));
    }
    writeln!(w, "{} {}", success("Deleted", config), parts.join(", "))?;
    if summary.detached_cycles > 0 || summary.detached_records > 0 {
        writeln!(
            w,
            "{} {} cycle(s), {} AI record(s)",
            dimmed("Detached:", config),
            summary.detached_cycles,
            summary.detached_records
        )?;
    }
    Ok(())
}

fn short_id(id: impl std::fmt::Display) -> String {
    id.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        IssuePriority, IssueStatus, NewComment, NewIssue, NewLabel, NewProject,
    };
    use crate::query::group_by_status;
    use chrono::TimeZone;

    fn plain() -> OutputConfig {
        OutputConfig::new(80, false)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap()
    }

    fn issue(number: u32, title: &str, status: IssueStatus) -> Issue {
        let mut new = NewIssue::titled(title);
        new.status = status;
        new.build(number, now()).unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_wrap_text_preserves_blank_lines() {
        let lines = wrap_text("first paragraph\n\nsecond", 40);
        assert_eq!(lines, vec!["first paragraph", "", "second"]);
    }

    #[test]
    fn test_wrap_text_wraps_long_lines() {
        let text = "word ".repeat(30);
        let lines = wrap_text(&text, 30);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 30));
    }

    #[test]
    fn test_issue_list_shows_reference_and_labels() {
        let label = NewLabel::named("Bug").build(now()).unwrap();
        let mut first = issue(1, "Fix login", IssueStatus::Todo);
        first.labels.push(label.id);
        first.priority = IssuePriority::Urgent;

        let out = render(|w| write_issues(w, &[first], &[label], &plain()));
        assert!(out.contains("Found 1 issue(s)"));
        assert!(out.contains("#1"));
        assert!(out.contains("urgent"));
        assert!(out.contains("Fix login"));
        assert!(out.contains("Bug"));
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(render(|w| write_issues(w, &[], &[], &plain())), "No issues found.\n");
        assert_eq!(render(|w| write_projects(w, &[], &plain())), "No projects found.\n");
        assert_eq!(render(|w| write_cycles(w, &[], now(), &plain())), "No cycles found.\n");
    }

    #[test]
    fn test_status_groups_render_headers_in_order() {
        let issues = vec![
            issue(1, "Ship it", IssueStatus::Done),
            issue(2, "Plan it", IssueStatus::Backlog),
        ];
        let groups = group_by_status(&issues);
        let out = render(|w| write_status_groups(w, &groups, &[], &plain()));

        let backlog = out.find("Backlog (1)").unwrap();
        let done = out.find("Done (1)").unwrap();
        assert!(backlog < done);
    }

    #[test]
    fn test_issue_details_include_comments_and_subtasks() {
        let parent = issue(1, "Auth epic", IssueStatus::InProgress);
        let child = issue(2, "Login form", IssueStatus::Todo);
        let comment = NewComment {
            issue: parent.id,
            content: "Started on the token flow".to_string(),
            is_ai_generated: true,
        }
        .build(now())
        .unwrap();

        let details = IssueDetails {
            issue: parent,
            labels: Vec::new(),
            comments: vec![comment],
            subtasks: vec![child],
            parent: None,
        };
        let out = render(|w| write_issue_details(w, &details, &plain()));
        assert!(out.contains("#1: Auth epic"));
        assert!(out.contains("Subtasks (1)"));
        assert!(out.contains("#2 Login form"));
        assert!(out.contains("Comments (1)"));
        assert!(out.contains("[ai]"));
        assert!(out.contains("Started on the token flow"));
    }

    #[test]
    fn test_project_details_show_completion() {
        let project = NewProject::named("CodingFlow").build(now()).unwrap();
        let issues = vec![
            issue(1, "a", IssueStatus::Done),
            issue(2, "b", IssueStatus::Done),
            issue(3, "c", IssueStatus::Backlog),
        ];
        let stats = ProjectStats::compute(&issues);
        let out = render(|w| write_project_details(w, &project, &stats, &plain()));
        assert!(out.contains("3 total, 2 done"));
        assert!(out.contains("66.7%"));
    }

    #[test]
    fn test_delete_summary_text() {
        let summary = DeleteSummary {
            projects: 1,
            issues: 3,
            comments: 2,
            labels: 5,
            detached_cycles: 1,
            detached_records: 0,
        };
        let out = render(|w| write_delete_summary(w, &summary, &plain()));
        assert!(out.starts_with("Deleted 1 project(s), 3 issue(s), 2 comment(s), 5 label(s)"));
        assert!(out.contains("Detached: 1 cycle(s)"));
    }

    #[test]
    fn test_write_json_is_pretty() {
        let project = NewProject::named("CodingFlow").build(now()).unwrap();
        let out = render(|w| write_json(w, &project));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "CodingFlow");
        assert!(out.contains('\n'));
    }
}
