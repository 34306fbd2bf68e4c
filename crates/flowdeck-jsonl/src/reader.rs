//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL data line by
//! line with buffering and line number tracking for error reporting.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Async reader for JSONL (JSON Lines) data.
///
/// Wraps an async reader in a [`BufReader`] and tracks the 1-based number of
/// the last line read so parse failures can point at the offending line.
///
/// # Examples
///
/// ```no_run
/// use flowdeck_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("store.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// while let Some(value) = reader.read_line::<serde_json::Value>().await? {
///     println!("{value}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    reader: BufReader<R>,
    /// 0 before any line is read, then the number of the last line read.
    line_number: usize,
    buf: String,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
            buf: String::new(),
        }
    }

    /// Returns the number of the last line read (0 before the first read).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line with its line terminator stripped.
    ///
    /// Blank lines are returned as empty strings; `None` signals end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying reader fails.
    pub async fn next_line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        let read = self.reader.read_line(&mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let trimmed_len = self.buf.trim_end_matches(['\n', '\r']).len();
        self.buf.truncate(trimmed_len);
        Ok(Some(self.buf.as_str()))
    }

    /// Reads and deserializes the next non-blank line.
    ///
    /// Whitespace-only lines are skipped. Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] carrying the line number if the line is not
    /// valid JSON for `T`, or [`Error::Io`] if reading fails.
    pub async fn read_line<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            let line_number = self.line_number + 1;
            let Some(line) = self.next_line().await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            return serde_json::from_str(line)
                .map(Some)
                .map_err(|source| Error::Json {
                    line: line_number,
                    source,
                });
        }
    }

    /// Consumes the reader, returning the underlying buffered reader.
    #[must_use]
    pub fn into_inner(self) -> BufReader<R> {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    #[test]
    fn new_reader_starts_at_line_zero() {
        let reader = JsonlReader::new(Cursor::new(b""));
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn read_line_skips_blank_lines() {
        let data = Cursor::new(b"{\"id\":1}\n\n   \n{\"id\":2}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.read_line::<Row>().await.unwrap(), Some(Row { id: 1 }));
        assert_eq!(reader.read_line::<Row>().await.unwrap(), Some(Row { id: 2 }));
        assert_eq!(reader.line_number(), 4);
        assert_eq!(reader.read_line::<Row>().await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_line_reports_line_of_bad_json() {
        let data = Cursor::new(b"{\"id\":1}\n{oops\n".to_vec());
        let mut reader = JsonlReader::new(data);

        reader.read_line::<Row>().await.unwrap();
        let err = reader.read_line::<Row>().await.unwrap_err();
        assert!(matches!(err, Error::Json { line: 2, .. }));
    }

    #[tokio::test]
    async fn next_line_strips_crlf() {
        let data = Cursor::new(b"{\"id\":7}\r\n".to_vec());
        let mut reader = JsonlReader::with_capacity(data, 64);

        assert_eq!(reader.next_line().await.unwrap(), Some("{\"id\":7}"));
        assert_eq!(reader.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_line_without_newline_is_read() {
        let data = Cursor::new(b"{\"id\":3}".to_vec());
        let mut reader = JsonlReader::new(data);

        assert_eq!(reader.read_line::<Row>().await.unwrap(), Some(Row { id: 3 }));
    }
}
