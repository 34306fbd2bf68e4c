//! Error types for flowdeck-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for flowdeck-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error at line {line}: {source}")]
    Json {
        /// 1-based line number, or 0 when serializing.
        line: usize,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid JSONL format.
    #[error("Invalid JSONL format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for flowdeck-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
