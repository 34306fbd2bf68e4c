//! CLI value enums and domain type conversions.

use clap::ValueEnum;

use crate::domain::{AiTool, IssuePriority, IssueStatus, IssueType};
use crate::query::SortOrder;

// ============================================================================
// Value Enums
// ============================================================================

/// Issue status for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueStatusArg {
    /// Not yet planned
    Backlog,
    /// Planned, not started
    Todo,
    /// Being worked on
    #[value(name = "in_progress", alias = "in-progress")]
    InProgress,
    /// Awaiting review
    #[value(name = "in_review", alias = "in-review")]
    InReview,
    /// Finished
    Done,
}

/// Issue priority for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityArg {
    /// Drop everything
    Urgent,
    /// Next up
    High,
    /// Default
    Medium,
    /// Whenever
    Low,
}

/// Issue type for CLI arguments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTypeArg {
    /// Large body of work
    Epic,
    /// User-facing feature
    Story,
    /// General task
    Task,
    /// Defect
    Bug,
    /// Child of another issue
    Subtask,
}

/// Sort order for the issue list
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrderArg {
    /// Most recently updated first
    #[default]
    Updated,
    /// Least recently updated first
    #[value(name = "updated-asc")]
    UpdatedAsc,
    /// Descending raw priority rank
    Priority,
    /// Newest first
    Newest,
}

/// AI tool for tracking commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiToolArg {
    /// Claude Code
    #[value(name = "claude_code", alias = "claude-code")]
    ClaudeCode,
    /// Cursor
    Cursor,
    /// Antigravity
    Antigravity,
    /// Codex CLI
    #[value(name = "codex_cli", alias = "codex-cli")]
    CodexCli,
    /// Gemini CLI
    #[value(name = "gemini_cli", alias = "gemini-cli")]
    GeminiCli,
    /// ChatGPT
    Chatgpt,
    /// Anything else
    Unknown,
}

// ============================================================================
// Domain Type Conversions
// ============================================================================

impl From<IssueStatusArg> for IssueStatus {
    fn from(arg: IssueStatusArg) -> Self {
        match arg {
            IssueStatusArg::Backlog => IssueStatus::Backlog,
            IssueStatusArg::Todo => IssueStatus::Todo,
            IssueStatusArg::InProgress => IssueStatus::InProgress,
            IssueStatusArg::InReview => IssueStatus::InReview,
            IssueStatusArg::Done => IssueStatus::Done,
        }
    }
}

impl From<PriorityArg> for IssuePriority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Urgent => IssuePriority::Urgent,
            PriorityArg::High => IssuePriority::High,
            PriorityArg::Medium => IssuePriority::Medium,
            PriorityArg::Low => IssuePriority::Low,
        }
    }
}

impl From<IssueTypeArg> for IssueType {
    fn from(arg: IssueTypeArg) -> Self {
        match arg {
            IssueTypeArg::Epic => IssueType::Epic,
            IssueTypeArg::Story => IssueType::Story,
            IssueTypeArg::Task => IssueType::Task,
            IssueTypeArg::Bug => IssueType::Bug,
            IssueTypeArg::Subtask => IssueType::Subtask,
        }
    }
}

impl From<SortOrderArg> for SortOrder {
    fn from(arg: SortOrderArg) -> Self {
        match arg {
            SortOrderArg::Updated => SortOrder::UpdatedDesc,
            SortOrderArg::UpdatedAsc => SortOrder::UpdatedAsc,
            SortOrderArg::Priority => SortOrder::PriorityHigh,
            SortOrderArg::Newest => SortOrder::CreatedDesc,
        }
    }
}

impl From<AiToolArg> for AiTool {
    fn from(arg: AiToolArg) -> Self {
        match arg {
            AiToolArg::ClaudeCode => AiTool::ClaudeCode,
            AiToolArg::Cursor => AiTool::Cursor,
            AiToolArg::Antigravity => AiTool::Antigravity,
            AiToolArg::CodexCli => AiTool::CodexCli,
            AiToolArg::GeminiCli => AiTool::GeminiCli,
            AiToolArg::Chatgpt => AiTool::ChatGpt,
            AiToolArg::Unknown => AiTool::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion_covers_every_status() {
        let converted: Vec<IssueStatus> = IssueStatusArg::value_variants()
            .iter()
            .map(|&arg| arg.into())
            .collect();
        assert_eq!(converted, IssueStatus::ALL);
    }

    #[test]
    fn test_priority_conversion_covers_every_priority() {
        let converted: Vec<IssuePriority> = PriorityArg::value_variants()
            .iter()
            .map(|&arg| arg.into())
            .collect();
        assert_eq!(converted, IssuePriority::ALL);
    }

    #[test]
    fn test_sort_order_conversion() {
        assert_eq!(SortOrder::from(SortOrderArg::default()), SortOrder::UpdatedDesc);
        assert_eq!(SortOrder::from(SortOrderArg::Priority), SortOrder::PriorityHigh);
        assert_eq!(SortOrder::from(SortOrderArg::Newest), SortOrder::CreatedDesc);
    }

    #[test]
    fn test_ai_tool_names_match_stored_names() {
        for arg in AiToolArg::value_variants() {
            let name = arg.to_possible_value().unwrap();
            assert_eq!(name.get_name(), AiTool::from(*arg).as_str());
        }
    }
}
