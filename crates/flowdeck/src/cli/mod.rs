//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for flowdeck using clap's
//! derive API.
//!
//! # Commands
//!
//! - `init`: Initialize a new workspace
//! - `project`: Create, list, show, update and delete projects
//! - `issue`: Manage issues, comments and labels
//! - `cycle`: Plan work into time-boxed cycles
//! - `ai`: Record AI-tool activity and context snapshots
//!
//! # Global Flags
//!
//! - `--json`: Output in JSON format (applies to all commands)
//!
//! # Example
//!
//! ```bash
//! flowdeck project create "CodingFlow"
//! flowdeck issue create "Add OAuth login" --project 8f14 --priority high
//! flowdeck issue list --status in_progress --search oauth
//! flowdeck cycle create --week
//! ```

mod args;
mod execute;
mod types;
mod validators;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub use args::{
    AiAction, AiArgs, AiSnapshotArgs, AiTrackArgs, CycleAction, CycleArgs, CycleCreateArgs,
    InitArgs, IssueAction, IssueArgs, IssueCreateArgs, IssueListArgs, IssueUpdateArgs,
    LabelAction, ProjectAction, ProjectArgs,
};
pub use types::{AiToolArg, IssueStatusArg, IssueTypeArg, PriorityArg, SortOrderArg};
pub use validators::{
    validate_color, validate_date, validate_hours, validate_id_prefix, validate_percentage,
    validate_title,
};

/// flowdeck - local-first project, issue and cycle tracking
///
/// Data lives in `.flowdeck/store.jsonl` next to your code.
#[derive(Parser, Debug)]
#[command(name = "flowdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize a new workspace
    ///
    /// Creates `.flowdeck/` with a configuration file and an empty store.
    Init(InitArgs),

    /// Manage projects
    Project(ProjectArgs),

    /// Manage issues, comments and labels
    Issue(IssueArgs),

    /// Manage cycles
    Cycle(CycleArgs),

    /// Track AI-tool activity
    Ai(AiArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// The clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    ///
    /// # Errors
    ///
    /// Any workspace, validation or I/O error raised by the command.
    pub async fn execute(&self) -> Result<()> {
        use crate::app::App;
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        let Some(command) = &self.command else {
            println!("flowdeck project and issue tracker");
            println!("Use --help for more information");
            return Ok(());
        };

        if let Commands::Init(args) = command {
            return execute::execute_init(args).await;
        }

        let mut app = App::from_directory(&std::env::current_dir()?).await?;
        match command {
            Commands::Init(_) => Ok(()),
            Commands::Project(args) => execute::execute_project(&mut app, args, output_mode).await,
            Commands::Issue(args) => execute::execute_issue(&mut app, args, output_mode).await,
            Commands::Cycle(args) => execute::execute_cycle(&mut app, args, output_mode).await,
            Commands::Ai(args) => execute::execute_ai(&mut app, args, output_mode).await,
        }
    }
}
