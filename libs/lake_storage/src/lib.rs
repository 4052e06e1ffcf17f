pub mod fs;
pub mod jsonl;
pub mod retry;
pub mod settings;
pub mod store;

pub use fs::{write_jsonl_atomic, write_to_dlq};
pub use jsonl::{DecodeStrategy, JsonlStream};
pub use retry::{
    get_with_retry, list_with_retry, upload_with_retry, with_retry, with_retry_if, RetryPolicy,
};
pub use settings::{build_client, StorageSettings};
pub use store::{ensure_bucket_exists, BucketStatus, ObjectBody, ObjectStore, S3Store};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("object store error: {0}")]
    Store(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
