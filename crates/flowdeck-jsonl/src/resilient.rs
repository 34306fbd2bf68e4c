//! Resilient loading: parse what can be parsed, report the rest.

use crate::{JsonlReader, Result, Warning};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncRead;

/// Reads every record from a JSONL file, skipping lines that fail to parse.
///
/// Blank and whitespace-only lines are ignored silently. Each malformed line
/// produces a [`Warning::MalformedJson`] with its 1-based line number. Records
/// are returned in file order.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the file cannot be opened or read. Parse
/// failures never abort the load.
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    read_resilient_from(file).await
}

/// Like [`read_jsonl_resilient`] but reads from any async reader.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if reading fails.
pub async fn read_resilient_from<T, R>(reader: R) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    R: AsyncRead + Unpin,
{
    let mut reader = JsonlReader::new(reader);
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    loop {
        let Some(line) = reader.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                let line_number = reader.line_number();
                tracing::debug!(line_number, error = %e, "Skipping malformed JSONL line");
                warnings.push(Warning::MalformedJson {
                    line_number,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok((records, warnings))
}
