//! Contractor verification model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `contractor_verifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContractorVerification {
    pub id: DbId,
    pub contractor_id: DbId,
    pub license_number: Option<String>,
    pub license_type: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    pub insurance_provider: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
    pub background_check_status: String,
    pub background_check_date: Option<Timestamp>,
    pub background_check_candidate_id: Option<String>,
    pub is_verified: bool,
    pub admin_verified: bool,
    pub admin_verified_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// License and insurance details submitted by the contractor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitVerification {
    #[validate(length(min = 1, max = 100))]
    pub license_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub license_type: Option<String>,
    pub license_expiry: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub insurance_provider: Option<String>,
    pub insurance_expiry: Option<NaiveDate>,
}

/// Admin approve/reject body.
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationDecision {
    /// `approve` or `reject`.
    pub decision: String,
    pub rejection_reason: Option<String>,
}

/// Admin update of the background check outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBackgroundCheck {
    pub status: String,
}

/// Query parameters for the admin review queue.
#[derive(Debug, Deserialize)]
pub struct VerificationListParams {
    pub is_verified: Option<bool>,
    pub background_check_status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
