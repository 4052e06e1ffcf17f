use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require;
use crate::ValidationError;

/// Risk category assigned at onboarding, used downstream for risk analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    pub const ALL: [RiskProfile; 3] = [RiskProfile::Low, RiskProfile::Medium, RiskProfile::High];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub cpf: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub risk_profile: RiskProfile,
}

impl Customer {
    /// Build a validated customer. The id is generated here and never
    /// reassigned; `updated_at` equals `created_at` at creation.
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        cpf: String,
        created_at: DateTime<Utc>,
        risk_profile: RiskProfile,
    ) -> Result<Self, ValidationError> {
        require("first_name", &first_name)?;
        require("last_name", &last_name)?;
        require("cpf", &cpf)?;
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            email,
            cpf,
            created_at,
            updated_at: created_at,
            risk_profile,
        })
    }
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.') && !email.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Result<Customer, ValidationError> {
        Customer::new(
            "Ana".into(),
            "Souza".into(),
            "ana.souza@example.com".into(),
            "123.456.789-09".into(),
            Utc::now(),
            RiskProfile::Low,
        )
    }

    #[test]
    fn valid_customer_gets_id_and_equal_timestamps() {
        let customer = sample().unwrap();
        assert!(Uuid::parse_str(&customer.id).is_ok());
        assert_eq!(customer.created_at, customer.updated_at);
    }

    #[test]
    fn rejects_invalid_emails() {
        for bad in ["", "no-at-sign", "@example.com", "ana@", "ana@nodot", "a@b@c.com", "ana @x.com"] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
        assert!(is_valid_email("ana.souza@example.com"));
    }

    #[test]
    fn rejects_missing_required_fields() {
        let err = Customer::new(
            "".into(),
            "Souza".into(),
            "ana@example.com".into(),
            "123".into(),
            Utc::now(),
            RiskProfile::High,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField("first_name")));
    }

    #[test]
    fn serializes_flat_with_iso_timestamps() {
        let customer = sample().unwrap();
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["risk_profile"], "LOW");
        let created = value["created_at"].as_str().unwrap();
        assert!(created.contains('T'), "expected ISO-8601, got {created}");
        assert!(value.as_object().unwrap().values().all(|v| !v.is_object() && !v.is_array()));
    }
}
