//! Booking entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub client_id: DbId,
    pub contractor_id: DbId,
    pub service_package_id: DbId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: String,
    pub total_amount_cents: i64,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for booking a package. Contractor and amount are taken
/// from the package.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBooking {
    pub service_package_id: DbId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Fully resolved insert row.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub client_id: DbId,
    pub contractor_id: DbId,
    pub service_package_id: DbId,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub total_amount_cents: i64,
    pub notes: Option<String>,
}

/// Body of `PUT /bookings/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBookingStatus {
    pub status: String,
    /// Required when cancelling.
    pub cancellation_reason: Option<String>,
}

/// Query parameters for listing the caller's bookings.
#[derive(Debug, Deserialize)]
pub struct BookingListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
