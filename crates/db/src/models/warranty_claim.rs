//! Warranty claim model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use fait_core::types::{DbId, Timestamp};

/// A row from the `warranty_claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WarrantyClaim {
    pub id: DbId,
    pub booking_id: DbId,
    pub client_id: DbId,
    pub contractor_id: DbId,
    pub description: String,
    pub status: String,
    pub resolution_notes: Option<String>,
    pub photo_urls: Vec<String>,
    pub resolved_by: Option<DbId>,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for filing a claim.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWarrantyClaim {
    pub booking_id: DbId,
    pub description: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// Body of `PUT /warranty-claims/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWarrantyClaimStatus {
    pub status: String,
    pub resolution_notes: Option<String>,
}

/// Query parameters for listing claims.
#[derive(Debug, Deserialize)]
pub struct WarrantyClaimListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
