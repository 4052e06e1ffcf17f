use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::AsyncBufRead;
use tracing::{error, info, warn};

use crate::StorageError;

/// Streaming body of a fetched object.
pub type ObjectBody = Pin<Box<dyn AsyncBufRead + Send>>;

/// Outcome of a bucket existence check. Transport failures are reported as
/// errors, never as `NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    Exists,
    NotFound,
}

/// Landing-zone surface used by the generators. Kept as a trait so
/// integration tests can substitute an in-memory double.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn bucket_status(&self, bucket: &str) -> Result<BucketStatus, StorageError>;

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;

    /// List object keys under `prefix`, in no particular order.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError>;

    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StorageError>;
}

/// MinIO-backed store speaking the S3 API.
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn bucket_status(&self, bucket: &str) -> Result<BucketStatus, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(BucketStatus::Exists),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(BucketStatus::NotFound)
                } else {
                    Err(StorageError::Store(format!(
                        "head_bucket failed: {service_err}"
                    )))
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| StorageError::Store(format!("create_bucket failed: {e}")))?;
        Ok(())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::Store(format!("list_objects failed: {e}")))?;

            for object in response.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }

            continuation_token = response.next_continuation_token().map(|s| s.to_string());
            if continuation_token.is_none() {
                break;
            }
        }

        Ok(keys)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Store(format!("get_object failed: {e}")))?;

        Ok(Box::pin(response.body.into_async_read()))
    }

    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::Store(format!("failed to read {}: {e}", path.display())))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Store(format!("put_object failed: {e}")))?;
        Ok(())
    }
}

/// Idempotent bucket bootstrap: check existence, create when absent.
/// A creation failure is fatal, the pipeline has no target container without it.
pub async fn ensure_bucket_exists(
    store: &dyn ObjectStore,
    bucket: &str,
) -> Result<(), StorageError> {
    match store.bucket_status(bucket).await? {
        BucketStatus::Exists => Ok(()),
        BucketStatus::NotFound => {
            warn!(bucket, "bucket not found, creating");
            match store.create_bucket(bucket).await {
                Ok(()) => {
                    info!(bucket, "bucket created");
                    Ok(())
                }
                Err(err) => {
                    error!(bucket, error = %err, "failed to create bucket");
                    Err(err)
                }
            }
        }
    }
}
