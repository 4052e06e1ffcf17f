use std::collections::{BTreeMap, HashSet};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use lake_storage::{BucketStatus, ObjectBody, ObjectStore, RetryPolicy, StorageError};

/// Millisecond-scale retry policy so failure-path tests stay fast while
/// keeping the production attempt count.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    }
}

/// In-memory landing zone standing in for MinIO.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<HashSet<String>>,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn object_key(bucket: &str, key: &str) -> String {
        format!("{bucket}/{key}")
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&Self::object_key(bucket, key))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn bucket_status(&self, bucket: &str) -> Result<BucketStatus, StorageError> {
        if self.buckets.lock().unwrap().contains(bucket) {
            Ok(BucketStatus::Exists)
        } else {
            Ok(BucketStatus::NotFound)
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.buckets.lock().unwrap().insert(bucket.to_string());
        Ok(())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let full_prefix = Self::object_key(bucket, prefix);
        let objects = self.objects.lock().unwrap();
        Ok(objects
            .keys()
            .filter(|k| k.starts_with(&full_prefix))
            .map(|k| k[bucket.len() + 1..].to_string())
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        let bytes = self
            .object(bucket, key)
            .ok_or_else(|| StorageError::Store(format!("no such key: {bucket}/{key}")))?;
        Ok(Box::pin(Cursor::new(bytes)))
    }

    async fn upload_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StorageError> {
        let bytes = tokio::fs::read(path).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(Self::object_key(bucket, key), bytes);
        Ok(())
    }
}

/// Store whose uploads always fail, for dead-letter path tests.
#[derive(Default)]
pub struct FailingUploadStore {
    inner: MemoryStore,
    pub upload_attempts: AtomicU32,
}

impl FailingUploadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObjectStore for FailingUploadStore {
    async fn bucket_status(&self, bucket: &str) -> Result<BucketStatus, StorageError> {
        self.inner.bucket_status(bucket).await
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        self.inner.create_bucket(bucket).await
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.inner.list_keys(bucket, prefix).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectBody, StorageError> {
        self.inner.get_object(bucket, key).await
    }

    async fn upload_file(&self, _: &str, _: &str, _: &Path) -> Result<(), StorageError> {
        self.upload_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Store("injected upload failure".to_string()))
    }
}
