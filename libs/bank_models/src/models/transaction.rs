use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require;
use crate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    PixIn,
    PixOut,
    TedIn,
    TedOut,
    BoletoPay,
}

impl TransactionType {
    pub const ALL: [TransactionType; 5] = [
        TransactionType::PixIn,
        TransactionType::PixOut,
        TransactionType::TedIn,
        TransactionType::TedOut,
        TransactionType::BoletoPay,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub transaction_date: DateTime<Utc>,
    pub status: String,
    pub counterparty_bank: String,
}

impl Transaction {
    /// Build a validated transaction originating from `account_id`.
    /// Generated records are always settled, so status is fixed COMPLETED.
    pub fn new(
        account_id: String,
        amount: f64,
        transaction_type: TransactionType,
        transaction_date: DateTime<Utc>,
        counterparty_bank: String,
    ) -> Result<Self, ValidationError> {
        require("account_id", &account_id)?;
        require("counterparty_bank", &counterparty_bank)?;
        if amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(amount));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            transaction_type,
            transaction_date,
            status: "COMPLETED".to_string(),
            counterparty_bank,
        })
    }
}
