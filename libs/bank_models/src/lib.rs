pub mod models;

pub use models::account::{Account, AccountType};
pub use models::customer::{Customer, RiskProfile};
pub use models::transaction::{Transaction, TransactionType};

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("amount must be positive, got {0}")]
    InvalidAmount(f64),
}
