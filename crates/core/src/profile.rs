//! Contact-field validation for profiles.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const MAX_NAME_LENGTH: usize = 120;

/// US ZIP or ZIP+4.
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid regex"));

/// Deliberately loose: one `@`, no whitespace, a dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Digits with optional `+`, spaces, dashes, dots and parentheses; 7-15 digits.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9 ().-]{7,20}$").expect("valid regex"));

/// Two-letter state code.
static STATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid regex"));

pub fn validate_full_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Full name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Full name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid email address '{email}'")))
    }
}

pub fn validate_zip_code(zip: &str) -> Result<(), CoreError> {
    if ZIP_RE.is_match(zip) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid ZIP code '{zip}'")))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(phone) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid phone number '{phone}'")))
    }
}

pub fn validate_state(state: &str) -> Result<(), CoreError> {
    if STATE_RE.is_match(state) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid state '{state}'. Use the two-letter code"
        )))
    }
}

/// Validate whichever optional contact fields are present.
pub fn validate_contact(
    email: Option<&str>,
    phone: Option<&str>,
    state: Option<&str>,
    zip_code: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(phone) = phone {
        validate_phone(phone)?;
    }
    if let Some(state) = state {
        validate_state(state)?;
    }
    if let Some(zip) = zip_code {
        validate_zip_code(zip)?;
    }
    Ok(())
}
