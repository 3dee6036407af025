//! Review rating and comment rules, for both platform reviews and imported
//! reviews from external sites.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// External platforms report averages that may be zero for unrated listings.
pub const MIN_EXTERNAL_RATING: f64 = 0.0;
pub const MAX_EXTERNAL_RATING: f64 = 5.0;

pub const MAX_COMMENT_LENGTH: usize = 5_000;

pub const VALID_EXTERNAL_PLATFORMS: &[&str] =
    &["google", "yelp", "angi", "houzz", "bbb", "facebook", "other"];

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

pub fn validate_rating(rating: i16) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING} (got {rating})"
        )))
    }
}

pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    if comment.chars().count() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_external_rating(rating: f64) -> Result<(), CoreError> {
    if rating.is_finite() && (MIN_EXTERNAL_RATING..=MAX_EXTERNAL_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "External rating must be between 0 and 5 (got {rating})"
        )))
    }
}

pub fn validate_platform(platform: &str) -> Result<(), CoreError> {
    if VALID_EXTERNAL_PLATFORMS.contains(&platform) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid platform '{platform}'. Must be one of: {}",
            VALID_EXTERNAL_PLATFORMS.join(", ")
        )))
    }
}

/// Only the client of a completed booking may review it.
pub fn check_can_review(
    booking_status: &str,
    booking_client_id: crate::types::DbId,
    user_id: crate::types::DbId,
) -> Result<(), CoreError> {
    if booking_client_id != user_id {
        return Err(CoreError::Forbidden(
            "Only the booking's client can review it".into(),
        ));
    }
    if booking_status != crate::booking::STATUS_COMPLETED {
        return Err(CoreError::Conflict(
            "Only completed bookings can be reviewed".into(),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
