//! Repository for the `bookings` table.

use sqlx::{PgConnection, PgPool};
use fait_core::booking::STATUS_CANCELLED;
use fait_core::types::DbId;

use crate::models::booking::{Booking, NewBooking};
use crate::models::points::PointsAward;
use crate::repositories::PointsRepo;

/// Column list for `bookings` queries.
const COLUMNS: &str = "\
    id, client_id, contractor_id, service_package_id, scheduled_date, \
    scheduled_time, status, total_amount_cents, notes, cancellation_reason, \
    cancelled_at, created_at, updated_at";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a new booking in `pending` status.
    pub async fn create(pool: &PgPool, input: &NewBooking) -> Result<Booking, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings \
                (client_id, contractor_id, service_package_id, scheduled_date, \
                 scheduled_time, total_amount_cents, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.client_id)
            .bind(input.contractor_id)
            .bind(input.service_package_id)
            .bind(input.scheduled_date)
            .bind(input.scheduled_time)
            .bind(input.total_amount_cents)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Bookings where the user is either the client or the contractor,
    /// soonest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings \
             WHERE (client_id = $1 OR contractor_id = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY scheduled_date DESC, scheduled_time DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move a booking from `from_status` to `to_status`.
    ///
    /// Returns `None` when the row no longer has `from_status` (concurrent
    /// change or missing row). Cancelling stamps `cancelled_at` and records
    /// the reason.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
        to_status: &str,
        cancellation_reason: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::transition_on(&mut conn, id, from_status, to_status, cancellation_reason).await
    }

    /// Same as [`Self::transition_status`], crediting `client_award` to the
    /// booking's client in the same transaction when the transition applies.
    pub async fn transition_status_with_award(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
        to_status: &str,
        cancellation_reason: Option<&str>,
        client_award: &PointsAward,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let Some(booking) =
            Self::transition_on(&mut tx, id, from_status, to_status, cancellation_reason).await?
        else {
            return Ok(None);
        };
        PointsRepo::award_on(&mut tx, booking.client_id, client_award, Some(booking.id)).await?;
        tx.commit().await?;
        Ok(Some(booking))
    }

    async fn transition_on(
        conn: &mut PgConnection,
        id: DbId,
        from_status: &str,
        to_status: &str,
        cancellation_reason: Option<&str>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET \
                status = $3, \
                cancellation_reason = CASE WHEN $3 = '{STATUS_CANCELLED}' THEN $4 ELSE cancellation_reason END, \
                cancelled_at = CASE WHEN $3 = '{STATUS_CANCELLED}' THEN NOW() ELSE cancelled_at END \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(from_status)
            .bind(to_status)
            .bind(cancellation_reason)
            .fetch_optional(conn)
            .await
    }
}
