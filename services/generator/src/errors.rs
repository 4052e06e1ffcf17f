#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("storage error: {0}")]
    Storage(#[from] lake_storage::StorageError),

    #[error("validation error: {0}")]
    Validation(#[from] bank_models::ValidationError),

    /// Ordering precondition, not a transient condition: retrying cannot fix
    /// a missing upstream batch.
    #[error("no published accounts found under '{0}' - run master_data first")]
    NoPublishedAccounts(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
