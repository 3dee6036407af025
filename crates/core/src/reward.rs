//! Rewards catalog rules.

use crate::error::CoreError;

pub const MAX_REWARD_NAME_LENGTH: usize = 200;
/// Upper bound on the price of a reward.
pub const MAX_REWARD_COST: i32 = 1_000_000;

pub fn validate_reward_name(name: &str) -> Result<(), CoreError> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Reward name is required".into()));
    }
    if len > MAX_REWARD_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Reward name exceeds maximum length of {MAX_REWARD_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_points_cost(points_cost: i32) -> Result<(), CoreError> {
    if !(1..=MAX_REWARD_COST).contains(&points_cost) {
        return Err(CoreError::Validation(format!(
            "Reward cost must be between 1 and {MAX_REWARD_COST} points (got {points_cost})"
        )));
    }
    Ok(())
}

/// Error for redeeming an inactive reward.
pub fn reward_unavailable() -> CoreError {
    CoreError::Conflict("This reward is no longer available".into())
}
