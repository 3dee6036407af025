//! Warranty claim lifecycle and filing rules.

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_REVIEWING: &str = "reviewing";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_RESOLVED: &str = "resolved";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_REVIEWING,
    STATUS_APPROVED,
    STATUS_REJECTED,
    STATUS_RESOLVED,
];

pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;
pub const MIN_DESCRIPTION_LENGTH: usize = 10;
pub const MAX_PHOTO_URLS: usize = 10;

/// Statuses reachable from `from_status`.
///
/// - `pending`   -> `reviewing`, `approved`, `rejected`
/// - `reviewing` -> `approved`, `rejected`
/// - `approved`  -> `resolved`
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_REVIEWING, STATUS_APPROVED, STATUS_REJECTED],
        STATUS_REVIEWING => &[STATUS_APPROVED, STATUS_REJECTED],
        STATUS_APPROVED => &[STATUS_RESOLVED],
        _ => &[],
    }
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "warranty claim",
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid warranty claim status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Whether moving into `status` closes the claim (records resolver and time).
pub fn is_closing(status: &str) -> bool {
    status == STATUS_RESOLVED || status == STATUS_REJECTED
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    let len = description.trim().chars().count();
    if len < MIN_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description must be at least {MIN_DESCRIPTION_LENGTH} characters"
        )));
    }
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_photo_urls(urls: &[String]) -> Result<(), CoreError> {
    if urls.len() > MAX_PHOTO_URLS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_PHOTO_URLS} photos may be attached"
        )));
    }
    if let Some(bad) = urls
        .iter()
        .find(|u| !(u.starts_with("https://") || u.starts_with("http://")))
    {
        return Err(CoreError::Validation(format!("Invalid photo URL '{bad}'")));
    }
    Ok(())
}

/// Claims can only be filed on completed bookings.
pub fn check_booking_claimable(booking_status: &str) -> Result<(), CoreError> {
    if booking_status != crate::booking::STATUS_COMPLETED {
        return Err(CoreError::Conflict(format!(
            "Warranty claims can only be filed for completed bookings (booking is '{booking_status}')"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_table() {
        assert!(validate_transition(STATUS_PENDING, STATUS_REVIEWING).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_APPROVED).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_REJECTED).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_RESOLVED).is_err());
        assert!(validate_transition(STATUS_REVIEWING, STATUS_APPROVED).is_ok());
        assert!(validate_transition(STATUS_REVIEWING, STATUS_PENDING).is_err());
        assert!(validate_transition(STATUS_APPROVED, STATUS_RESOLVED).is_ok());
        assert!(validate_transition(STATUS_APPROVED, STATUS_REJECTED).is_err());
    }

    #[test]
    fn resolved_and_rejected_are_terminal() {
        for s in [STATUS_RESOLVED, STATUS_REJECTED] {
            assert!(valid_transitions(s).is_empty());
            assert!(is_closing(s));
        }
        assert!(!is_closing(STATUS_APPROVED));
    }

    #[test]
    fn description_bounds() {
        assert!(validate_description("too short").is_err());
        assert!(validate_description("Leak returned under the sink").is_ok());
        assert!(validate_description(&"x".repeat(5_001)).is_err());
    }

    #[test]
    fn photo_urls() {
        assert!(validate_photo_urls(&["https://cdn.example.com/a.jpg".into()]).is_ok());
        assert!(validate_photo_urls(&["ftp://nope".into()]).is_err());
        let many: Vec<String> = (0..11).map(|i| format!("https://x/{i}.png")).collect();
        assert!(validate_photo_urls(&many).is_err());
    }

    #[test]
    fn only_completed_bookings_are_claimable() {
        assert!(check_booking_claimable("completed").is_ok());
        assert!(check_booking_claimable("confirmed").is_err());
    }
}
