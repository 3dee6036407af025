//! Booking status constants, lifecycle rules and participant checks.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status of a freshly requested booking.
pub const STATUS_PENDING: &str = "pending";
/// Contractor accepted the booking.
pub const STATUS_CONFIRMED: &str = "confirmed";
/// Work finished. Terminal.
pub const STATUS_COMPLETED: &str = "completed";
/// Cancelled by either party. Terminal.
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_CONFIRMED,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

pub const MAX_NOTES_LENGTH: usize = 2_000;
pub const MAX_CANCELLATION_REASON_LENGTH: usize = 1_000;

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Statuses reachable from `from_status`.
///
/// - `pending`   -> `confirmed`, `cancelled`
/// - `confirmed` -> `completed`, `cancelled`
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_CONFIRMED, STATUS_CANCELLED],
        STATUS_CONFIRMED => &[STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "booking",
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
            "Invalid booking status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

pub fn is_terminal(status: &str) -> bool {
    valid_transitions(status).is_empty()
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// How the caller relates to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingParty {
    Client,
    Contractor,
    Admin,
}

impl BookingParty {
    /// Resolve the caller's relation to a booking, or `None` for outsiders.
    pub fn resolve(
        user_id: crate::types::DbId,
        is_admin: bool,
        client_id: crate::types::DbId,
        contractor_id: crate::types::DbId,
    ) -> Option<Self> {
        if is_admin {
            Some(Self::Admin)
        } else if user_id == contractor_id {
            Some(Self::Contractor)
        } else if user_id == client_id {
            Some(Self::Client)
        } else {
            None
        }
    }
}

/// Contractors confirm and complete, either side cancels, admins do anything
/// the lifecycle allows.
pub fn check_party_may_set(party: BookingParty, next: &str) -> Result<(), CoreError> {
    let allowed = match party {
        BookingParty::Admin => true,
        BookingParty::Contractor => {
            matches!(next, STATUS_CONFIRMED | STATUS_COMPLETED | STATUS_CANCELLED)
        }
        BookingParty::Client => next == STATUS_CANCELLED,
    };
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "This participant may not set booking status to '{next}'"
        )))
    }
}

pub fn validate_notes(notes: &str) -> Result<(), CoreError> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_cancellation_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A cancellation reason is required".into(),
        ));
    }
    if reason.chars().count() > MAX_CANCELLATION_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Cancellation reason exceeds maximum length of {MAX_CANCELLATION_REASON_LENGTH} characters"
        )));
    }
    Ok(())
}
