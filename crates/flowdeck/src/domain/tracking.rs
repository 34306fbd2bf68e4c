//! Append-only AI activity records.

use super::ids::{EventId, IssueId, SnapshotId};
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known AI coding tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiTool {
    /// Claude Code
    ClaudeCode,
    /// Cursor
    Cursor,
    /// Antigravity
    Antigravity,
    /// Codex CLI
    CodexCli,
    /// Gemini CLI
    GeminiCli,
    /// `ChatGPT`
    #[serde(rename = "chatgpt")]
    ChatGpt,
    /// Anything not recognised
    Unknown,
}

impl AiTool {
    /// Every known tool
    pub const ALL: [AiTool; 7] = [
        Self::ClaudeCode,
        Self::Cursor,
        Self::Antigravity,
        Self::CodexCli,
        Self::GeminiCli,
        Self::ChatGpt,
        Self::Unknown,
    ];

    /// Stored identifier
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClaudeCode => "claude_code",
            Self::Cursor => "cursor",
            Self::Antigravity => "antigravity",
            Self::CodexCli => "codex_cli",
            Self::GeminiCli => "gemini_cli",
            Self::ChatGpt => "chatgpt",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable name
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::ClaudeCode => "Claude Code",
            Self::Cursor => "Cursor",
            Self::Antigravity => "Antigravity",
            Self::CodexCli => "Codex CLI",
            Self::GeminiCli => "Gemini CLI",
            Self::ChatGpt => "ChatGPT",
            Self::Unknown => "Unknown",
        }
    }

    /// Map a stored identifier to a tool, falling back to [`AiTool::Unknown`].
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or(Self::Unknown)
    }
}

impl fmt::Display for AiTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One recorded AI interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiTrackingEvent {
    /// Unique identifier
    pub id: EventId,

    /// When the interaction happened
    pub timestamp: DateTime<Utc>,

    /// Free-form tag such as `generate` or `refactor`
    pub event_type: String,

    /// Tool identifier as reported
    pub ai_tool: String,

    /// Short description of the prompt
    #[serde(default)]
    pub prompt_summary: String,

    /// Paths touched by the interaction
    #[serde(default)]
    pub files_changed: Vec<String>,

    /// Tokens consumed
    #[serde(default)]
    pub tokens_used: u64,

    /// Related issue; cleared if the issue is deleted
    #[serde(default)]
    pub issue: Option<IssueId>,
}

impl AiTrackingEvent {
    /// The tool as a known enum value.
    #[must_use]
    pub fn tool(&self) -> AiTool {
        AiTool::parse_lenient(&self.ai_tool)
    }
}

/// Data for recording an AI interaction
#[derive(Debug, Clone)]
pub struct NewAiEvent {
    /// Free-form tag
    pub event_type: String,

    /// Tool identifier
    pub ai_tool: String,

    /// Short description of the prompt
    pub prompt_summary: String,

    /// Paths touched
    pub files_changed: Vec<String>,

    /// Tokens consumed
    pub tokens_used: u64,

    /// Related issue
    pub issue: Option<IssueId>,
}

impl NewAiEvent {
    /// Build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] when the event type or tool is blank.
    pub fn build(self, now: DateTime<Utc>) -> Result<AiTrackingEvent, ValidationError> {
        let event_type = validate::non_empty("event_type", &self.event_type)?;
        let ai_tool = validate::non_empty("ai_tool", &self.ai_tool)?;
        Ok(AiTrackingEvent {
            id: EventId::new(),
            timestamp: now,
            event_type,
            ai_tool,
            prompt_summary: self.prompt_summary,
            files_changed: self.files_changed,
            tokens_used: self.tokens_used,
            issue: self.issue,
        })
    }
}

/// Progress checkpoint for resuming AI-assisted work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Unique identifier
    pub id: SnapshotId,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Progress in percent, 0 to 100
    pub completion_percentage: f64,

    /// Files relevant to the work
    #[serde(default)]
    pub key_files: Vec<String>,

    /// Remaining items
    #[serde(default)]
    pub pending_items: Vec<String>,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Related issue; cleared if the issue is deleted
    #[serde(default)]
    pub issue: Option<IssueId>,
}

/// Data for saving a context snapshot
#[derive(Debug, Clone, Default)]
pub struct NewContextSnapshot {
    /// Progress in percent
    pub completion_percentage: f64,

    /// Relevant files
    pub key_files: Vec<String>,

    /// Remaining items
    pub pending_items: Vec<String>,

    /// Notes
    pub notes: String,

    /// Related issue
    pub issue: Option<IssueId>,
}

impl NewContextSnapshot {
    /// Build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] when the percentage is outside 0..=100.
    pub fn build(self, now: DateTime<Utc>) -> Result<ContextSnapshot, ValidationError> {
        let completion_percentage =
            validate::in_range("completion_percentage", self.completion_percentage, 0.0, 100.0)?;
        Ok(ContextSnapshot {
            id: SnapshotId::new(),
            timestamp: now,
            completion_percentage,
            key_files: self.key_files,
            pending_items: self.pending_items,
            notes: self.notes,
            issue: self.issue,
        })
    }
}
