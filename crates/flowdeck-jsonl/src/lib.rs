//! JSON Lines persistence primitives for flowdeck.
//!
//! Provides buffered async reading and writing of newline-delimited JSON,
//! resilient loading that skips corrupt lines while reporting them as
//! [`Warning`]s, and crash-safe whole-file replacement.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod resilient;
pub mod warning;
pub mod writer;

pub use atomic::{write_jsonl_atomic, write_jsonl_atomic_iter};
pub use error::{Error, Result};
pub use reader::JsonlReader;
pub use resilient::{read_jsonl_resilient, read_resilient_from};
pub use warning::Warning;
pub use writer::JsonlWriter;
