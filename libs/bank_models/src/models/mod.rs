pub mod account;
pub mod customer;
pub mod transaction;

use crate::ValidationError;

/// Rejects empty or whitespace-only values for required string fields.
pub(crate) fn require(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(())
}
