//! JSONL writing operations.
//!
//! This module provides async functionality for writing data in JSONL format
//! with efficient buffering.

use crate::{Error, Result};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Async writer for JSONL (JSON Lines) data.
///
/// Each value is serialized to a single line followed by `\n`. Output is
/// buffered; call [`flush`](Self::flush) before dropping the writer.
///
/// # Examples
///
/// ```no_run
/// use flowdeck_jsonl::JsonlWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("output.jsonl").await?;
/// let mut writer = JsonlWriter::new(file);
/// writer.write(&serde_json::json!({"id": 1})).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlWriter<W> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Creates a new `JsonlWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
        }
    }

    /// Serializes one value as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails or [`Error::Io`] if the
    /// write fails.
    pub async fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let mut line =
            serde_json::to_vec(value).map_err(|source| Error::Json { line: 0, source })?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        Ok(())
    }

    /// Serializes every value of an iterator, one per line.
    ///
    /// # Errors
    ///
    /// Stops at the first failing value; see [`write`](Self::write).
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered output to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// This does not flush; call [`flush`](Self::flush) first.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::io::Cursor;

    #[derive(Serialize)]
    struct Row<'a> {
        id: u32,
        name: &'a str,
    }

    #[tokio::test]
    async fn write_appends_newline_per_value() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer.write(&Row { id: 1, name: "a" }).await.unwrap();
        writer.write(&Row { id: 2, name: "b" }).await.unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n"
        );
    }

    #[tokio::test]
    async fn write_all_with_empty_iterator_writes_nothing() {
        let mut writer = JsonlWriter::with_capacity(Cursor::new(Vec::new()), 16);
        writer.write_all(Vec::<Row<'_>>::new()).await.unwrap();
        writer.flush().await.unwrap();

        assert!(writer.into_inner().into_inner().into_inner().is_empty());
    }

    #[tokio::test]
    async fn embedded_newlines_stay_on_one_line() {
        let mut writer = JsonlWriter::new(Cursor::new(Vec::new()));
        writer
            .write(&Row {
                id: 1,
                name: "line1\nline2",
            })
            .await
            .unwrap();
        writer.flush().await.unwrap();

        let text = String::from_utf8(writer.into_inner().into_inner().into_inner()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
