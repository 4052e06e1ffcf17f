use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::error;

use crate::StorageError;

/// Write records as line-delimited JSON to a temporary sibling file, then
/// atomically rename it onto `path`. Readers never observe a partial batch;
/// a crash mid-write leaves only the `.tmp` file behind.
pub async fn write_jsonl_atomic<T: Serialize>(
    records: &[T],
    path: &Path,
) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let mut buf = Vec::new();
    for record in records {
        serde_json::to_writer(&mut buf, record)?;
        buf.push(b'\n');
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, &buf).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

/// Preserve an unpublishable batch for offline replay: copy it into the
/// dead-letter directory under a timestamp-qualified name and log the reason.
pub async fn write_to_dlq(
    local_path: &Path,
    dlq_dir: &Path,
    reason: &str,
) -> Result<PathBuf, StorageError> {
    tokio::fs::create_dir_all(dlq_dir).await?;

    let file_name = local_path
        .file_name()
        .ok_or_else(|| StorageError::InvalidPath(local_path.display().to_string()))?;
    let timestamp = Utc::now().format("%Y%m%d%H%M%S");
    let dlq_name = format!("{}.{timestamp}.dlq", file_name.to_string_lossy());
    let dlq_path = dlq_dir.join(dlq_name);

    tokio::fs::copy(local_path, &dlq_path).await?;
    error!(reason, path = %dlq_path.display(), "batch written to dead-letter queue");
    Ok(dlq_path)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use tempfile::tempdir;

    use super::*;

    #[derive(Serialize)]
    struct Record {
        id: u32,
        label: &'static str,
    }

    fn records() -> Vec<Record> {
        vec![
            Record { id: 1, label: "a" },
            Record { id: 2, label: "b" },
        ]
    }

    #[tokio::test]
    async fn atomic_write_is_idempotent_and_leaves_no_tmp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batches").join("records.jsonl");

        write_jsonl_atomic(&records(), &path).await.unwrap();
        let first = tokio::fs::read(&path).await.unwrap();

        write_jsonl_atomic(&records(), &path).await.unwrap();
        let second = tokio::fs::read(&path).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.iter().filter(|b| **b == b'\n').count(), 2);
        assert!(!dir.path().join("batches").join("records.jsonl.tmp").exists());
    }

    #[tokio::test]
    async fn atomic_write_replaces_prior_content_wholesale() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.jsonl");

        tokio::fs::write(&path, b"stale content\n").await.unwrap();
        write_jsonl_atomic(&records(), &path).await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(content.starts_with("{\"id\":1"));
        assert!(!content.contains("stale"));
    }

    #[tokio::test]
    async fn dlq_copy_matches_original_byte_for_byte() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transactions_20250101000000.jsonl");
        let dlq_dir = dir.path().join("dlq");

        write_jsonl_atomic(&records(), &path).await.unwrap();
        let dlq_path = write_to_dlq(&path, &dlq_dir, "upload retries exhausted")
            .await
            .unwrap();

        let name = dlq_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("transactions_20250101000000.jsonl."));
        assert!(name.ends_with(".dlq"));

        let original = tokio::fs::read(&path).await.unwrap();
        let copied = tokio::fs::read(&dlq_path).await.unwrap();
        assert_eq!(original, copied);
    }
}
