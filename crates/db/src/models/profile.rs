//! Profile entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `profiles` table. `id` equals the auth subject.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub role: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `PUT /profiles/me`. Creates the profile on first call.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertProfile {
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 120))]
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Admin-only role change.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRole {
    pub role: String,
}

/// Query parameters for listing profiles.
#[derive(Debug, Deserialize)]
pub struct ProfileListParams {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
