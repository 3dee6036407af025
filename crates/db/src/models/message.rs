//! Booking message model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub booking_id: DbId,
    pub sender_id: DbId,
    pub recipient_id: DbId,
    pub content: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for posting to a booking thread.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMessage {
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

/// Per-user unread counter.
#[derive(Debug, Clone, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}
