//! Repository for the `rewards` and `user_rewards` tables.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::reward::{CreateReward, Reward, UpdateReward, UserReward, UserRewardDetail};
use crate::repositories::{PointsRepo, SpendResult};

/// Column list for `rewards` queries.
const COLUMNS: &str = "id, name, description, points_cost, is_active, created_at, updated_at";

/// Column list for `user_rewards` queries.
const USER_REWARD_COLUMNS: &str = "\
    id, user_id, reward_id, points_transaction_id, points_spent, redeemed_at, \
    created_at, updated_at";

/// Outcome of [`RewardRepo::redeem`].
#[derive(Debug)]
pub enum RedeemResult {
    Redeemed(UserReward),
    NotFound,
    /// The reward exists but is not active.
    Inactive,
    /// The balance at the time of the attempt was below `points_cost`.
    Insufficient { points_cost: i32, balance: i64 },
}

/// Provides operations for the rewards catalog and redemptions.
pub struct RewardRepo;

impl RewardRepo {
    pub async fn create(pool: &PgPool, input: &CreateReward) -> Result<Reward, sqlx::Error> {
        let query = format!(
            "INSERT INTO rewards (name, description, points_cost, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, TRUE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.points_cost)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reward>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rewards WHERE id = $1");
        sqlx::query_as::<_, Reward>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The catalog, cheapest first.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Reward>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rewards WHERE ($1 OR is_active) \
             ORDER BY points_cost ASC, id ASC"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReward,
    ) -> Result<Option<Reward>, sqlx::Error> {
        let query = format!(
            "UPDATE rewards SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                points_cost = COALESCE($4, points_cost), \
                is_active = COALESCE($5, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reward>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.points_cost)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Spend the reward's cost and record the redemption in one transaction.
    ///
    /// The reward row is share-locked so its cost and activity cannot change
    /// mid-redemption; the spend locks the user's profile.
    pub async fn redeem(
        pool: &PgPool,
        user_id: DbId,
        reward_id: DbId,
    ) -> Result<RedeemResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM rewards WHERE id = $1 FOR SHARE");
        let Some(reward) = sqlx::query_as::<_, Reward>(&query)
            .bind(reward_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RedeemResult::NotFound);
        };
        if !reward.is_active {
            return Ok(RedeemResult::Inactive);
        }

        let description = format!("Redeemed reward: {}", reward.name);
        let transaction =
            match PointsRepo::spend_on(&mut tx, user_id, reward.points_cost, &description).await? {
                SpendResult::Spent(transaction) => transaction,
                SpendResult::Insufficient { balance } => {
                    tx.rollback().await?;
                    return Ok(RedeemResult::Insufficient {
                        points_cost: reward.points_cost,
                        balance,
                    });
                }
            };

        let query = format!(
            "INSERT INTO user_rewards (user_id, reward_id, points_transaction_id, points_spent) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_REWARD_COLUMNS}"
        );
        let redemption = sqlx::query_as::<_, UserReward>(&query)
            .bind(user_id)
            .bind(reward.id)
            .bind(transaction.id)
            .bind(transaction.points_amount)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RedeemResult::Redeemed(redemption))
    }

    /// Redemptions by a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserRewardDetail>, sqlx::Error> {
        sqlx::query_as::<_, UserRewardDetail>(
            "SELECT ur.id, ur.reward_id, r.name AS reward_name, ur.points_spent, ur.redeemed_at \
             FROM user_rewards ur \
             JOIN rewards r ON r.id = ur.reward_id \
             WHERE ur.user_id = $1 \
             ORDER BY ur.redeemed_at DESC, ur.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
