//! Review and external review models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub booking_id: DbId,
    pub client_id: DbId,
    pub contractor_id: DbId,
    pub service_package_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for reviewing a completed booking.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReview {
    pub booking_id: DbId,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 5000))]
    pub comment: Option<String>,
}

/// Insert row for a review; the parties and package come from the booking.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub booking_id: DbId,
    pub client_id: DbId,
    pub contractor_id: DbId,
    pub service_package_id: DbId,
    pub rating: i16,
    pub comment: Option<String>,
}

/// Average rating and count for a contractor.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingSummary {
    pub contractor_id: DbId,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}

/// A row from the `external_reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExternalReview {
    pub id: DbId,
    pub contractor_id: DbId,
    pub platform: String,
    pub url: String,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for linking an external review source. Upserts per platform.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertExternalReview {
    pub platform: String,
    #[validate(url)]
    pub url: String,
    pub rating: Option<f64>,
    #[validate(range(min = 0))]
    pub review_count: Option<i32>,
}
