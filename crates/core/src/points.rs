//! Points ledger rules: transaction types, award amounts and balance math.

use crate::error::CoreError;

pub const TYPE_EARNED: &str = "earned";
pub const TYPE_SPENT: &str = "spent";

pub const VALID_TRANSACTION_TYPES: &[&str] = &[TYPE_EARNED, TYPE_SPENT];

// ---------------------------------------------------------------------------
// Award amounts
// ---------------------------------------------------------------------------

/// Credited to the client when a booking is completed.
pub const AWARD_BOOKING_COMPLETED: i32 = 50;
/// Credited to the client for reviewing a booking.
pub const AWARD_REVIEW_SUBMITTED: i32 = 25;
/// Credited to the contractor when an admin approves verification.
pub const AWARD_VERIFICATION_APPROVED: i32 = 200;
/// Credited once when a profile is first created.
pub const AWARD_WELCOME: i32 = 100;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

pub fn validate_transaction_type(kind: &str) -> Result<(), CoreError> {
    if VALID_TRANSACTION_TYPES.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid transaction type '{kind}'. Must be 'earned' or 'spent'"
        )))
    }
}

/// Amounts are always stored positive; the type carries the sign.
pub fn validate_amount(points_amount: i32) -> Result<(), CoreError> {
    if points_amount <= 0 {
        return Err(CoreError::Validation(format!(
            "Points amount must be positive (got {points_amount})"
        )));
    }
    Ok(())
}

/// Balance = total earned minus total spent.
pub fn balance(earned: i64, spent: i64) -> i64 {
    earned - spent
}

/// Reject a spend that would take the balance below zero.
pub fn check_can_spend(balance: i64, amount: i32) -> Result<(), CoreError> {
    let required = i64::from(amount);
    if balance < required {
        return Err(CoreError::InsufficientPoints { required, balance });
    }
    Ok(())
}
