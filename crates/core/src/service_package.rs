//! Service package listing rules.

use crate::error::CoreError;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;
pub const MAX_SCOPE_ITEMS: usize = 50;
/// Upper bound on a listed price ($1,000,000).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Title is required".into()));
    }
    if len > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_price_cents(price_cents: i64) -> Result<(), CoreError> {
    if !(0..=MAX_PRICE_CENTS).contains(&price_cents) {
        return Err(CoreError::Validation(format!(
            "Price must be between 0 and {MAX_PRICE_CENTS} cents (got {price_cents})"
        )));
    }
    Ok(())
}

/// Scope and exclusion lists: bounded length, no blank entries.
pub fn validate_items(field: &str, items: &[String]) -> Result<(), CoreError> {
    if items.len() > MAX_SCOPE_ITEMS {
        return Err(CoreError::Validation(format!(
            "{field} may contain at most {MAX_SCOPE_ITEMS} items"
        )));
    }
    if items.iter().any(|i| i.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "{field} must not contain blank items"
        )));
    }
    Ok(())
}
