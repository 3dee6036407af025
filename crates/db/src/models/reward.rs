//! Rewards catalog and redemption models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::types::{DbId, Timestamp};

/// A row from the `rewards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reward {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin DTO for adding a reward.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReward {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub points_cost: i32,
    pub is_active: Option<bool>,
}

/// Admin DTO for updating a reward. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReward {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub points_cost: Option<i32>,
    pub is_active: Option<bool>,
}

/// A row from the `user_rewards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserReward {
    pub id: DbId,
    pub user_id: DbId,
    pub reward_id: DbId,
    pub points_transaction_id: DbId,
    pub points_spent: i32,
    pub redeemed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A redemption joined with the reward's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserRewardDetail {
    pub id: DbId,
    pub reward_id: DbId,
    pub reward_name: String,
    pub points_spent: i32,
    pub redeemed_at: Timestamp,
}
