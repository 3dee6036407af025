//! Booking conversation rules.

use crate::error::CoreError;
use crate::types::DbId;

pub const MAX_CONTENT_LENGTH: usize = 4_000;

pub fn validate_content(content: &str) -> Result<(), CoreError> {
    let len = content.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Message content is required".into()));
    }
    if len > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Message exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// The recipient of a message is the other participant of the booking.
/// Returns `Forbidden` when the sender is not part of the booking.
pub fn recipient_for(sender_id: DbId, client_id: DbId, contractor_id: DbId) -> Result<DbId, CoreError> {
    if sender_id == client_id {
        Ok(contractor_id)
    } else if sender_id == contractor_id {
        Ok(client_id)
    } else {
        Err(CoreError::Forbidden(
            "Only booking participants can send messages".into(),
        ))
    }
}
