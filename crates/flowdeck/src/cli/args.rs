//! CLI argument structs for all commands.
//!
//! Entity arguments accept a full id or a unique prefix of at least four
//! hex digits. Labels may also be given by name.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use super::types::{AiToolArg, IssueStatusArg, IssueTypeArg, PriorityArg, SortOrderArg};
use super::validators::{
    validate_color, validate_date, validate_hours, validate_id_prefix, validate_percentage,
    validate_title,
};
use crate::storage::DEFAULT_AI_EVENT_LIMIT;

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Suppress output messages
    #[arg(short, long)]
    pub quiet: bool,
}

// ============================================================================
// Projects
// ============================================================================

/// Arguments for the `project` command
#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub action: ProjectAction,
}

/// Project management actions
#[derive(Subcommand, Debug, Clone)]
pub enum ProjectAction {
    /// Create a project (seeds the default labels unless disabled in config)
    Create {
        /// Project name
        #[arg(value_parser = validate_title)]
        name: String,

        /// Description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Icon name
        #[arg(long)]
        icon: Option<String>,

        /// Hex color, e.g. 007AFF
        #[arg(short, long, value_parser = validate_color)]
        color: Option<String>,
    },

    /// List projects, most recently updated first
    List {
        /// Case-insensitive search over name and description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a project with its statistics
    Show {
        /// Project id or prefix
        #[arg(value_parser = validate_id_prefix)]
        project: String,
    },

    /// Update a project
    Update {
        /// Project id or prefix
        #[arg(value_parser = validate_id_prefix)]
        project: String,

        /// New name
        #[arg(long, value_parser = validate_title)]
        name: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New icon
        #[arg(long)]
        icon: Option<String>,

        /// New hex color
        #[arg(short, long, value_parser = validate_color)]
        color: Option<String>,
    },

    /// Delete a project with its issues, comments and labels
    Delete {
        /// Project id or prefix
        #[arg(value_parser = validate_id_prefix)]
        project: String,
    },
}

// ============================================================================
// Issues
// ============================================================================

/// Arguments for the `issue` command
#[derive(Parser, Debug, Clone)]
pub struct IssueArgs {
    /// Issue subcommand
    #[command(subcommand)]
    pub action: IssueAction,
}

/// Issue management actions
#[derive(Subcommand, Debug, Clone)]
pub enum IssueAction {
    /// Create an issue
    Create(IssueCreateArgs),

    /// List issues with optional filters
    List(IssueListArgs),

    /// Show an issue with its comments and subtasks
    Show {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,
    },

    /// Change an issue's status
    Status {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,

        /// New status
        #[arg(value_enum)]
        status: IssueStatusArg,
    },

    /// Update an issue
    Update(IssueUpdateArgs),

    /// Delete issues together with their subtasks and comments
    Delete {
        /// Issue ids or prefixes
        #[arg(required = true, num_args = 1.., value_parser = validate_id_prefix)]
        issues: Vec<String>,
    },

    /// Add a comment to an issue
    Comment {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,

        /// Comment text
        #[arg(value_parser = validate_title)]
        content: String,

        /// Mark the comment as AI-generated
        #[arg(long)]
        ai: bool,
    },

    /// Manage labels
    Label {
        /// Label subcommand
        #[command(subcommand)]
        action: LabelAction,
    },
}

/// Arguments for `issue create`
#[derive(Args, Debug, Clone)]
pub struct IssueCreateArgs {
    /// Issue title
    #[arg(value_parser = validate_title)]
    pub title: String,

    /// Owning project id or prefix
    #[arg(short = 'P', long, value_parser = validate_id_prefix)]
    pub project: Option<String>,

    /// Description
    #[arg(short = 'D', long, default_value = "")]
    pub description: String,

    /// Initial status
    #[arg(short, long, value_enum, default_value = "backlog")]
    pub status: IssueStatusArg,

    /// Priority
    #[arg(short, long, value_enum, default_value = "medium")]
    pub priority: PriorityArg,

    /// Issue type
    #[arg(short = 't', long = "type", value_enum, default_value = "task")]
    pub issue_type: IssueTypeArg,

    /// Estimate in hours
    #[arg(short, long, value_parser = validate_hours)]
    pub estimate: Option<f64>,

    /// Parent issue id or prefix
    #[arg(long, value_parser = validate_id_prefix)]
    pub parent: Option<String>,

    /// Labels by name or id (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub labels: Vec<String>,

    /// Mark as generated by this AI tool
    #[arg(long, value_enum)]
    pub ai_tool: Option<AiToolArg>,
}

/// Arguments for `issue list`
#[derive(Args, Debug, Clone)]
pub struct IssueListArgs {
    /// Filter by project id or prefix
    #[arg(short = 'P', long, value_parser = validate_id_prefix)]
    pub project: Option<String>,

    /// Filter by status
    #[arg(short, long, value_enum)]
    pub status: Option<IssueStatusArg>,

    /// Filter by priority
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// Filter by issue type
    #[arg(short = 't', long = "type", value_enum)]
    pub issue_type: Option<IssueTypeArg>,

    /// Filter by cycle id or prefix
    #[arg(short, long, value_parser = validate_id_prefix)]
    pub cycle: Option<String>,

    /// Filter by label name or id
    #[arg(short, long)]
    pub label: Option<String>,

    /// Only AI-generated issues
    #[arg(long)]
    pub ai: bool,

    /// Case-insensitive search over title and description
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// Sort order
    #[arg(long, value_enum, default_value = "updated")]
    pub sort: SortOrderArg,

    /// Maximum number of issues to display
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Group the output by status
    #[arg(short, long)]
    pub grouped: bool,
}

/// Arguments for `issue update`
#[derive(Args, Debug, Clone)]
pub struct IssueUpdateArgs {
    /// Issue id or prefix
    #[arg(value_parser = validate_id_prefix)]
    pub issue: String,

    /// New title
    #[arg(long, value_parser = validate_title)]
    pub title: Option<String>,

    /// New description
    #[arg(short = 'D', long)]
    pub description: Option<String>,

    /// New status
    #[arg(short, long, value_enum)]
    pub status: Option<IssueStatusArg>,

    /// New priority
    #[arg(short, long, value_enum)]
    pub priority: Option<PriorityArg>,

    /// New type
    #[arg(short = 't', long = "type", value_enum)]
    pub issue_type: Option<IssueTypeArg>,

    /// New estimate in hours
    #[arg(short, long, value_parser = validate_hours)]
    pub estimate: Option<f64>,

    /// Actual hours spent
    #[arg(short, long, value_parser = validate_hours)]
    pub actual: Option<f64>,

    /// Move to another project (the issue is renumbered)
    #[arg(short = 'P', long, value_parser = validate_id_prefix, conflicts_with = "no_project")]
    pub project: Option<String>,

    /// Detach from its project
    #[arg(long)]
    pub no_project: bool,

    /// New parent issue
    #[arg(long, value_parser = validate_id_prefix, conflicts_with = "no_parent")]
    pub parent: Option<String>,

    /// Make this a top-level issue
    #[arg(long)]
    pub no_parent: bool,
}

/// Label management actions
#[derive(Subcommand, Debug, Clone)]
pub enum LabelAction {
    /// Attach a label to an issue
    Add {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,

        /// Label name or id
        label: String,
    },

    /// Detach a label from an issue
    Remove {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,

        /// Label name or id
        label: String,
    },

    /// List labels
    List {
        /// Only labels of this project
        #[arg(short = 'P', long, value_parser = validate_id_prefix)]
        project: Option<String>,
    },

    /// Create a label
    Create {
        /// Label name
        #[arg(value_parser = validate_title)]
        name: String,

        /// Hex color
        #[arg(short, long, value_parser = validate_color)]
        color: Option<String>,

        /// Owning project; global when omitted
        #[arg(short = 'P', long, value_parser = validate_id_prefix)]
        project: Option<String>,
    },

    /// Delete a label and detach it from every issue
    Delete {
        /// Label name or id
        label: String,

        /// Project used to resolve a label name
        #[arg(short = 'P', long, value_parser = validate_id_prefix)]
        project: Option<String>,
    },
}

// ============================================================================
// Cycles
// ============================================================================

/// Arguments for the `cycle` command
#[derive(Parser, Debug, Clone)]
pub struct CycleArgs {
    /// Cycle subcommand
    #[command(subcommand)]
    pub action: CycleAction,
}

/// Cycle management actions
#[derive(Subcommand, Debug, Clone)]
pub enum CycleAction {
    /// Create a cycle from explicit dates or a template
    Create(CycleCreateArgs),

    /// List cycles
    List {
        /// Only cycles of this project
        #[arg(short = 'P', long, value_parser = validate_id_prefix)]
        project: Option<String>,

        /// Only cycles running now
        #[arg(long, conflicts_with = "upcoming")]
        active: bool,

        /// Only cycles that have not started
        #[arg(long)]
        upcoming: bool,
    },

    /// Show a cycle with its issues and statistics
    Show {
        /// Cycle id or prefix
        #[arg(value_parser = validate_id_prefix)]
        cycle: String,
    },

    /// Change a cycle's name, dates or capacity
    Update {
        /// Cycle id or prefix
        #[arg(value_parser = validate_id_prefix)]
        cycle: String,

        /// New name
        #[arg(long, value_parser = validate_title)]
        name: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New start date
        #[arg(long, value_parser = validate_date)]
        start: Option<DateTime<Utc>>,

        /// New end date
        #[arg(long, value_parser = validate_date)]
        end: Option<DateTime<Utc>>,

        /// New capacity in hours
        #[arg(long, value_parser = validate_hours)]
        capacity: Option<f64>,

        /// New planned story points
        #[arg(long, value_parser = validate_hours)]
        points: Option<f64>,
    },

    /// Archive a cycle, detaching its issues
    Archive {
        /// Cycle id or prefix
        #[arg(value_parser = validate_id_prefix)]
        cycle: String,
    },

    /// Plan an issue into a cycle
    Assign {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,

        /// Cycle id or prefix
        #[arg(value_parser = validate_id_prefix)]
        cycle: String,
    },

    /// Take an issue out of its cycle
    Unassign {
        /// Issue id or prefix
        #[arg(value_parser = validate_id_prefix)]
        issue: String,
    },

    /// Delete a cycle, detaching its issues
    Delete {
        /// Cycle id or prefix
        #[arg(value_parser = validate_id_prefix)]
        cycle: String,
    },
}

/// Arguments for `cycle create`
#[derive(Args, Debug, Clone)]
pub struct CycleCreateArgs {
    /// Cycle name (defaults to the template's name)
    #[arg(long, value_parser = validate_title)]
    pub name: Option<String>,

    /// Use the current ISO week
    #[arg(long, conflicts_with_all = ["sprint", "start", "end"])]
    pub week: bool,

    /// Use a two-week sprint starting this week
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub sprint: bool,

    /// Start date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = validate_date, requires = "end")]
    pub start: Option<DateTime<Utc>>,

    /// End date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = validate_date, requires = "start")]
    pub end: Option<DateTime<Utc>>,

    /// Capacity in hours
    #[arg(long, value_parser = validate_hours)]
    pub capacity: Option<f64>,

    /// Planned story points
    #[arg(long, value_parser = validate_hours)]
    pub points: Option<f64>,

    /// Description
    #[arg(short = 'D', long, default_value = "")]
    pub description: String,

    /// Owning project id or prefix
    #[arg(short = 'P', long, value_parser = validate_id_prefix)]
    pub project: Option<String>,
}

// ============================================================================
// AI tracking
// ============================================================================

/// Arguments for the `ai` command
#[derive(Parser, Debug, Clone)]
pub struct AiArgs {
    /// AI tracking subcommand
    #[command(subcommand)]
    pub action: AiAction,
}

/// AI tracking actions
#[derive(Subcommand, Debug, Clone)]
pub enum AiAction {
    /// Record an AI interaction
    Track(AiTrackArgs),

    /// Save a context snapshot for resuming work
    Snapshot(AiSnapshotArgs),

    /// List recorded events, newest first
    Events {
        /// Only events for this issue
        #[arg(short, long, value_parser = validate_id_prefix)]
        issue: Option<String>,

        /// Maximum number of events
        #[arg(short = 'n', long, default_value_t = DEFAULT_AI_EVENT_LIMIT)]
        limit: usize,
    },

    /// Show today's AI activity
    Stats,
}

/// Arguments for `ai track`
#[derive(Args, Debug, Clone)]
pub struct AiTrackArgs {
    /// Tool used
    #[arg(value_enum)]
    pub tool: AiToolArg,

    /// Event type, e.g. `generation` or `refactor`
    #[arg(short = 'e', long = "type", value_parser = validate_title, default_value = "generation")]
    pub event_type: String,

    /// Short description of the prompt
    #[arg(short, long, default_value = "")]
    pub summary: String,

    /// Files changed (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Tokens consumed
    #[arg(short, long, default_value_t = 0)]
    pub tokens: u64,

    /// Related issue id or prefix
    #[arg(short, long, value_parser = validate_id_prefix)]
    pub issue: Option<String>,
}

/// Arguments for `ai snapshot`
#[derive(Args, Debug, Clone)]
pub struct AiSnapshotArgs {
    /// Completion percentage, 0 to 100
    #[arg(value_parser = validate_percentage, required_unless_present = "list")]
    pub completion: Option<f64>,

    /// Key files (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub files: Vec<String>,

    /// Pending items (repeatable)
    #[arg(long = "pending")]
    pub pending: Vec<String>,

    /// Notes
    #[arg(short, long, default_value = "")]
    pub notes: String,

    /// Related issue id or prefix
    #[arg(short, long, value_parser = validate_id_prefix)]
    pub issue: Option<String>,

    /// List snapshots for the issue instead of saving one
    #[arg(long, requires = "issue")]
    pub list: bool,
}
