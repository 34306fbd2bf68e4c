//! Comments attached to issues.

use super::ids::{CommentId, IssueId};
use super::validate;
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on exactly one issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier
    pub id: CommentId,

    /// Issue the comment belongs to
    pub issue: IssueId,

    /// Comment body
    pub content: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Whether an AI tool wrote it
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// Data for adding a comment
#[derive(Debug, Clone)]
pub struct NewComment {
    /// Target issue
    pub issue: IssueId,

    /// Comment body
    pub content: String,

    /// Whether an AI tool wrote it
    pub is_ai_generated: bool,
}

impl NewComment {
    /// Build the stored entity.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] for blank content.
    pub fn build(self, now: DateTime<Utc>) -> Result<Comment, ValidationError> {
        validate::non_empty("content", &self.content)?;
        Ok(Comment {
            id: CommentId::new(),
            issue: self.issue,
            content: self.content,
            created_at: now,
            is_ai_generated: self.is_ai_generated,
        })
    }
}
