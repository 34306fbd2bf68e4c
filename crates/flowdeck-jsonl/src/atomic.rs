//! Atomic write operations for JSONL files.
//!
//! Data is written to a sibling temporary file which is then renamed over the
//! target. Renames within one filesystem are atomic on POSIX systems, so a
//! crash mid-write leaves the previous file intact.

use crate::{JsonlWriter, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Atomically writes a slice of values to a JSONL file.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, a value fails to
/// serialize, an I/O error occurs, or the final rename fails. On failure the
/// original file is left unchanged and the temporary file is removed on a
/// best-effort basis.
///
/// # Examples
///
/// ```no_run
/// use flowdeck_jsonl::write_jsonl_atomic;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rows = vec![serde_json::json!({"id": 1}), serde_json::json!({"id": 2})];
/// write_jsonl_atomic("store.jsonl", &rows).await?;
/// # Ok(())
/// # }
/// ```
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Atomically writes an iterator of values to a JSONL file.
///
/// # Errors
///
/// See [`write_jsonl_atomic`].
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    if let Err(e) = write_to_temp_file(&temp_path, values).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        tracing::debug!(path = %temp_path.display(), error = %e, "Discarded partial JSONL write");
        return Err(e);
    }

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Appends `.tmp` to the file name (`store.jsonl` -> `store.jsonl.tmp`).
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

async fn write_to_temp_file<T, I>(temp_path: &Path, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    writer.into_inner().into_inner().sync_all().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use tempfile::tempdir;

    #[derive(Serialize)]
    struct Row {
        id: u32,
    }

    #[test]
    fn make_temp_path_with_extension() {
        let temp = make_temp_path(Path::new("/path/to/store.jsonl"));
        assert_eq!(temp, Path::new("/path/to/store.jsonl.tmp"));
    }

    #[test]
    fn make_temp_path_without_extension() {
        let temp = make_temp_path(Path::new("/path/to/store"));
        assert_eq!(temp, Path::new("/path/to/store.tmp"));
    }

    #[tokio::test]
    async fn atomic_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("store.jsonl");
        tokio::fs::write(&target, "old content\n").await.unwrap();

        write_jsonl_atomic(&target, &[Row { id: 42 }]).await.unwrap();

        let contents = tokio::fs::read_to_string(&target).await.unwrap();
        assert_eq!(contents, "{\"id\":42}\n");
        assert!(!dir.path().join("store.jsonl.tmp").exists());
    }

    #[tokio::test]
    async fn atomic_write_empty_slice_creates_empty_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("empty.jsonl");

        write_jsonl_atomic::<Row, _>(&target, &[]).await.unwrap();

        let metadata = tokio::fs::metadata(&target).await.unwrap();
        assert_eq!(metadata.len(), 0);
    }

    #[tokio::test]
    async fn failed_write_leaves_original_untouched() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("store.jsonl");

        let result = write_jsonl_atomic(&target, &[Row { id: 1 }]).await;

        assert!(result.is_err());
        assert!(!target.exists());
    }
}
