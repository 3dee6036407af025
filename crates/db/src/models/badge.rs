//! Badge catalog and awarded badge models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Badge {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub criterion: String,
    pub threshold: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin DTO for adding a badge to the catalog.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBadge {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(url)]
    pub icon_url: Option<String>,
    pub criterion: String,
    pub threshold: i32,
    pub is_active: Option<bool>,
}

/// A row from the `user_badges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadge {
    pub id: DbId,
    pub user_id: DbId,
    pub badge_id: DbId,
    pub is_featured: bool,
    pub awarded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A held badge joined with its catalog entry.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserBadgeDetail {
    /// The `user_badges` id.
    pub id: DbId,
    pub badge_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub criterion: String,
    pub threshold: i32,
    pub is_featured: bool,
    pub awarded_at: Timestamp,
}

/// Request body for featuring or unfeaturing a held badge.
#[derive(Debug, Clone, Deserialize)]
pub struct SetFeaturedBadge {
    pub is_featured: bool,
}

/// Query parameters for the badge and reward catalogs.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    /// Admin only; defaults to `false`.
    pub include_inactive: Option<bool>,
}
