use std::path::Path;

use chrono::Utc;
use lake_storage::{upload_with_retry, write_jsonl_atomic, write_to_dlq, ObjectStore, RetryPolicy};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::PipelineResult;

/// Durable-publish path shared by both generators: atomic local JSONL write,
/// retrying upload, dead-letter fallback on exhausted retries. Returns the
/// object key on success; an unrecoverable upload failure is re-raised after
/// the local artifact is preserved, so the process exits non-zero.
pub async fn save_and_upload<T: Serialize>(
    store: &dyn ObjectStore,
    policy: &RetryPolicy,
    bucket: &str,
    data_dir: &Path,
    entity: &str,
    records: &[T],
) -> PipelineResult<String> {
    let filename = format!("{entity}_{}.jsonl", Utc::now().format("%Y%m%d%H%M%S"));
    let local_path = data_dir.join(&filename);
    let key = format!("{entity}/{filename}");

    info!(entity, count = records.len(), path = %local_path.display(), "saving batch");
    write_jsonl_atomic(records, &local_path).await?;

    if let Err(err) = upload_with_retry(store, policy, bucket, &key, &local_path).await {
        let dlq_dir = data_dir.join("dlq");
        if let Err(dlq_err) = write_to_dlq(&local_path, &dlq_dir, &err.to_string()).await {
            error!(error = %dlq_err, "failed to write dead-letter copy");
        }
        return Err(err.into());
    }

    info!(bucket, key, "upload complete");
    Ok(key)
}
