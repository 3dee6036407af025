//! Badge criteria and qualification.
//!
//! Each badge names one criterion and a threshold. A user earns the badge
//! once their measured value for that criterion reaches the threshold.

use crate::error::CoreError;

/// Total points ever earned (spending does not reduce it).
pub const CRITERION_LIFETIME_POINTS: &str = "lifetime_points";
/// Completed bookings, as client or contractor.
pub const CRITERION_COMPLETED_BOOKINGS: &str = "completed_bookings";
/// Reviews written as a client.
pub const CRITERION_REVIEWS_WRITTEN: &str = "reviews_written";

pub const VALID_CRITERIA: &[&str] = &[
    CRITERION_LIFETIME_POINTS,
    CRITERION_COMPLETED_BOOKINGS,
    CRITERION_REVIEWS_WRITTEN,
];

pub const MAX_BADGE_NAME_LENGTH: usize = 100;

pub fn validate_criterion(criterion: &str) -> Result<(), CoreError> {
    if VALID_CRITERIA.contains(&criterion) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid badge criterion '{criterion}'. Must be one of: {}",
            VALID_CRITERIA.join(", ")
        )))
    }
}

pub fn validate_threshold(threshold: i32) -> Result<(), CoreError> {
    if threshold <= 0 {
        return Err(CoreError::Validation(format!(
            "Badge threshold must be positive (got {threshold})"
        )));
    }
    Ok(())
}

pub fn validate_badge_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Badge name is required".into()));
    }
    if len > MAX_BADGE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Badge name exceeds maximum length of {MAX_BADGE_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// A user's measured values for every criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BadgeProgress {
    pub lifetime_points: i64,
    pub completed_bookings: i64,
    pub reviews_written: i64,
}

impl BadgeProgress {
    /// Measured value for `criterion`, `None` for an unknown criterion.
    pub fn value(&self, criterion: &str) -> Option<i64> {
        match criterion {
            CRITERION_LIFETIME_POINTS => Some(self.lifetime_points),
            CRITERION_COMPLETED_BOOKINGS => Some(self.completed_bookings),
            CRITERION_REVIEWS_WRITTEN => Some(self.reviews_written),
            _ => None,
        }
    }

    /// Whether a badge with this criterion and threshold is earned.
    pub fn qualifies(&self, criterion: &str, threshold: i32) -> bool {
        self.value(criterion)
            .is_some_and(|value| value >= i64::from(threshold))
    }
}
