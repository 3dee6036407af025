//! Repository for the `messages` table.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::message::Message;

/// Column list for `messages` queries.
const COLUMNS: &str =
    "id, booking_id, sender_id, recipient_id, content, is_read, created_at, updated_at";

/// Provides operations for booking conversations.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(
        pool: &PgPool,
        booking_id: DbId,
        sender_id: DbId,
        recipient_id: DbId,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (booking_id, sender_id, recipient_id, content) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(booking_id)
            .bind(sender_id)
            .bind(recipient_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Thread of a booking, oldest first.
    pub async fn list_for_booking(
        pool: &PgPool,
        booking_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages WHERE booking_id = $1 \
             ORDER BY created_at ASC, id ASC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(booking_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark every message addressed to `recipient_id` in a booking as read.
    /// Returns the number of rows changed.
    pub async fn mark_read(
        pool: &PgPool,
        booking_id: DbId,
        recipient_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = TRUE \
             WHERE booking_id = $1 AND recipient_id = $2 AND NOT is_read",
        )
        .bind(booking_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(pool: &PgPool, recipient_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE recipient_id = $1 AND NOT is_read",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await
    }
}
