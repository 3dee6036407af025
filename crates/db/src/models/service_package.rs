//! Service package entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `service_packages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServicePackage {
    pub id: DbId,
    pub contractor_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub duration: Option<String>,
    pub scope: Vec<String>,
    pub exclusions: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a package. The contractor is the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServicePackage {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub price_cents: i64,
    #[validate(length(max = 100))]
    pub duration: Option<String>,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a package. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateServicePackage {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    #[validate(length(max = 100))]
    pub duration: Option<String>,
    pub scope: Option<Vec<String>>,
    pub exclusions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Query parameters for browsing packages.
#[derive(Debug, Deserialize)]
pub struct ServicePackageListParams {
    pub contractor_id: Option<DbId>,
    /// Defaults to `true` (only active listings).
    pub active_only: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
