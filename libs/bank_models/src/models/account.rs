use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require;
use crate::ValidationError;

/// Fixed branch code shared by every generated account.
pub const DEFAULT_AGENCY: &str = "0001";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Checking,
    Savings,
    Salary,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::Salary,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub customer_id: String,
    pub account_number: String,
    pub agency: String,
    pub balance: f64,
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
    pub status: String,
}

impl Account {
    /// Build a validated account owned by `customer_id`. `created_at` is
    /// copied from the owning customer by the caller.
    pub fn new(
        customer_id: String,
        account_number: String,
        balance: f64,
        account_type: AccountType,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        require("customer_id", &customer_id)?;
        require("account_number", &account_number)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            account_number,
            agency: DEFAULT_AGENCY.to_string(),
            balance,
            account_type,
            created_at,
            status: "ACTIVE".to_string(),
        })
    }
}
