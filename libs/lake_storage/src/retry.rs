use std::fmt::Display;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::store::{ObjectBody, ObjectStore};
use crate::StorageError;

/// Bounded exponential backoff: 5 attempts, delays 1s, 2s, 4s, 8s capped
/// at 10s. The only defense against transient landing-zone unavailability.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following failed attempt number `attempt`
    /// (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.base_delay.saturating_mul(1 << exponent);
        delay.min(self.max_delay)
    }
}

/// Run `op` until it succeeds, retries are exhausted, or `retryable` says the
/// error is not worth another attempt. The final error is returned unchanged.
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    op_name: &str,
    mut op: F,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && retryable(&err) => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation = op_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// [`with_retry_if`] treating every error as transient, matching the
/// remote-call contract of the pipeline.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, op_name: &str, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_if(policy, op_name, op, |_| true).await
}

pub async fn upload_with_retry(
    store: &dyn ObjectStore,
    policy: &RetryPolicy,
    bucket: &str,
    key: &str,
    path: &Path,
) -> Result<(), StorageError> {
    info!(bucket, key, "uploading to s3://{bucket}/{key}");
    with_retry(policy, "upload_file", || store.upload_file(bucket, key, path)).await
}

pub async fn list_with_retry(
    store: &dyn ObjectStore,
    policy: &RetryPolicy,
    bucket: &str,
    prefix: &str,
) -> Result<Vec<String>, StorageError> {
    with_retry(policy, "list_keys", || store.list_keys(bucket, prefix)).await
}

pub async fn get_with_retry(
    store: &dyn ObjectStore,
    policy: &RetryPolicy,
    bucket: &str,
    key: &str,
) -> Result<ObjectBody, StorageError> {
    with_retry(policy, "get_object", || store.get_object(bucket, key)).await
}
