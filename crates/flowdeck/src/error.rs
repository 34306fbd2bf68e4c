//! Error types for flowdeck.

use crate::domain::{CycleId, EntityKind, IssueId, ProjectId};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for flowdeck operations
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing the persisted store failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// An entity with the same id already exists in its table
    #[error("{kind} already exists: {id}")]
    DuplicateKey {
        /// Kind of the conflicting entity
        kind: EntityKind,
        /// The duplicated id
        id: String,
    },

    /// A referenced entity does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of the missing entity
        kind: EntityKind,
        /// The id that was looked up
        id: String,
    },

    /// Input was rejected before any mutation happened
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Workspace configuration problem
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Build a [`Error::NotFound`] for any displayable id.
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Build a [`Error::DuplicateKey`] for any displayable id.
    pub fn duplicate(kind: EntityKind, id: impl ToString) -> Self {
        Self::DuplicateKey {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Persistence(PersistenceError::Io(err))
    }
}

impl From<flowdeck_jsonl::Error> for Error {
    fn from(err: flowdeck_jsonl::Error) -> Self {
        Self::Persistence(PersistenceError::Jsonl(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(PersistenceError::Json(err))
    }
}

/// Failures of the on-disk store
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSONL library error
    #[error(transparent)]
    Jsonl(#[from] flowdeck_jsonl::Error),

    /// The file parsed but its contents are inconsistent
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Input rejected by validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace
    #[error("{field} cannot be empty")]
    Empty {
        /// Field name
        field: &'static str,
    },

    /// A numeric field was negative, NaN or infinite
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NotNonNegative {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// A numeric field fell outside its allowed range
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// Field name
        field: &'static str,
        /// Inclusive lower bound
        min: f64,
        /// Inclusive upper bound
        max: f64,
        /// Offending value
        value: f64,
    },

    /// Color was not six hex digits
    #[error("Invalid color '{0}': expected 6 hex digits such as 007AFF")]
    InvalidColor(String),

    /// Setting this parent would make the issue its own ancestor
    #[error("Issue {issue} cannot have {parent} as parent: it would create a cycle")]
    HierarchyCycle {
        /// Issue being re-parented
        issue: IssueId,
        /// Rejected parent
        parent: IssueId,
    },

    /// Two issues in one project share a number
    #[error("Issue number {number} is used more than once in project {project}")]
    DuplicateIssueNumber {
        /// Project id
        project: ProjectId,
        /// Repeated number
        number: u32,
    },

    /// Text could not be parsed as an id
    #[error("Invalid id '{0}'")]
    InvalidId(String),

    /// Id prefix shorter than the minimum
    #[error(
        "Id prefix '{0}' is too short (minimum {min} characters)",
        min = crate::domain::MIN_ID_PREFIX_LEN
    )]
    IdPrefixTooShort(String),

    /// Id prefix matched several entities
    #[error("Id prefix '{prefix}' matches {count} {kind} records")]
    AmbiguousId {
        /// Kind searched
        kind: EntityKind,
        /// The prefix given
        prefix: String,
        /// Number of matches
        count: usize,
    },

    /// Issues cannot be planned into an archived cycle
    #[error("Cycle {0} is archived")]
    ArchivedCycle(CycleId),
}

/// Workspace configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No `.flowdeck` directory between the working directory and the root
    #[error("Not a flowdeck workspace (run 'flowdeck init' first)")]
    NotInitialized,

    /// `init` ran in a directory that already has a workspace
    #[error("Workspace already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// Config file could not be parsed or written
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config file IO failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Unknown storage backend name
    #[error("Unknown storage backend '{0}' (expected 'jsonl' or 'memory')")]
    UnknownBackend(String),

    /// Semantically invalid setting
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Setting path
        field: &'static str,
        /// What was wrong
        reason: String,
    },
}

/// Result type alias for flowdeck operations
pub type Result<T> = std::result::Result<T, Error>;
