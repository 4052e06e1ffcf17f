use std::path::Path;

use anyhow::Result;
use bank_data_generator::master_data;
use dotenvy::dotenv;
use lake_storage::{build_client, S3Store, StorageSettings};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing; LOG_LEVEL defaults to info
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Credentials are validated before any I/O is attempted
    let settings = StorageSettings::from_env()?;
    let store = S3Store::new(build_client(&settings));

    info!(
        endpoint = %settings.endpoint,
        bucket = %settings.bucket,
        "starting master data generation"
    );

    master_data::run(&store, &settings.bucket, Path::new("data")).await?;
    Ok(())
}
