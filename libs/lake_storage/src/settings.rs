use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::Client;

use crate::StorageError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:9000";
pub const DEFAULT_BUCKET: &str = "landing-zone";

/// Connection settings for the MinIO landing zone, resolved from the
/// environment. Credentials have no default on purpose.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
}

impl StorageSettings {
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self {
            endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            access_key: required_var("MINIO_ROOT_USER")?,
            secret_key: required_var("MINIO_ROOT_PASSWORD")?,
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        })
    }
}

fn required_var(name: &str) -> Result<String, StorageError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(StorageError::Config(format!(
            "{name} must be set (use .env)"
        ))),
    }
}

/// Build an S3 client bound to the resolved settings. Path-style addressing
/// is required for MinIO and most S3-compatible services.
pub fn build_client(settings: &StorageSettings) -> Client {
    let credentials = Credentials::new(
        settings.access_key.clone(),
        settings.secret_key.clone(),
        None,
        None,
        "storage-settings",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(&settings.endpoint)
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();

    Client::from_conf(config)
}
