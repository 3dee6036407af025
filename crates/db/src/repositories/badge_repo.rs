//! Repository for the `badges` and `user_badges` tables.

use sqlx::PgPool;
use fait_core::badge::BadgeProgress;
use fait_core::booking::STATUS_COMPLETED;
use fait_core::points::TYPE_EARNED;
use fait_core::types::DbId;

use crate::models::badge::{Badge, CreateBadge, UserBadge, UserBadgeDetail};
use crate::repositories::ProfileRepo;

/// Column list for `badges` queries.
const COLUMNS: &str = "\
    id, name, description, icon_url, criterion, threshold, is_active, \
    created_at, updated_at";

/// Column list for `user_badges` queries.
const USER_BADGE_COLUMNS: &str =
    "id, user_id, badge_id, is_featured, awarded_at, created_at, updated_at";

/// Provides operations for the badge catalog and awarded badges.
pub struct BadgeRepo;

impl BadgeRepo {
    pub async fn create(pool: &PgPool, input: &CreateBadge) -> Result<Badge, sqlx::Error> {
        let query = format!(
            "INSERT INTO badges (name, description, icon_url, criterion, threshold, is_active) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(&input.icon_url)
            .bind(&input.criterion)
            .bind(input.threshold)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// The catalog, by name.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Badge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM badges WHERE ($1 OR is_active) ORDER BY name ASC"
        );
        sqlx::query_as::<_, Badge>(&query)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Badges held by a user, most recently awarded first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserBadgeDetail>, sqlx::Error> {
        sqlx::query_as::<_, UserBadgeDetail>(
            "SELECT ub.id, ub.badge_id, b.name, b.description, b.icon_url, b.criterion, \
                    b.threshold, ub.is_featured, ub.awarded_at \
             FROM user_badges ub \
             JOIN badges b ON b.id = ub.badge_id \
             WHERE ub.user_id = $1 \
             ORDER BY ub.awarded_at DESC, ub.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Measured values for every badge criterion.
    pub async fn progress(pool: &PgPool, user_id: DbId) -> Result<BadgeProgress, sqlx::Error> {
        let query = format!(
            "SELECT \
                (SELECT COALESCE(SUM(points_amount), 0)::BIGINT FROM points_transactions \
                  WHERE user_id = $1 AND transaction_type = '{TYPE_EARNED}'), \
                (SELECT COUNT(*) FROM bookings \
                  WHERE status = '{STATUS_COMPLETED}' AND (client_id = $1 OR contractor_id = $1)), \
                (SELECT COUNT(*) FROM reviews WHERE client_id = $1)"
        );
        let (lifetime_points, completed_bookings, reviews_written): (i64, i64, i64) =
            sqlx::query_as(&query).bind(user_id).fetch_one(pool).await?;
        Ok(BadgeProgress {
            lifetime_points,
            completed_bookings,
            reviews_written,
        })
    }

    /// Award every active badge the user qualifies for and does not hold.
    ///
    /// Returns the badges awarded by this call. Safe to run concurrently:
    /// `uq_user_badges_user_badge` keeps each badge to one award.
    pub async fn award_earned(pool: &PgPool, user_id: DbId) -> Result<Vec<Badge>, sqlx::Error> {
        let progress = Self::progress(pool, user_id).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM badges b \
             WHERE b.is_active \
               AND NOT EXISTS ( \
                   SELECT 1 FROM user_badges ub WHERE ub.badge_id = b.id AND ub.user_id = $1) \
             ORDER BY b.threshold ASC, b.id ASC"
        );
        let candidates = sqlx::query_as::<_, Badge>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;

        let mut awarded = Vec::new();
        for badge in candidates
            .into_iter()
            .filter(|b| progress.qualifies(&b.criterion, b.threshold))
        {
            let inserted: Option<(DbId,)> = sqlx::query_as(
                "INSERT INTO user_badges (user_id, badge_id) VALUES ($1, $2) \
                 ON CONFLICT ON CONSTRAINT uq_user_badges_user_badge DO NOTHING \
                 RETURNING id",
            )
            .bind(user_id)
            .bind(badge.id)
            .fetch_optional(pool)
            .await?;
            if inserted.is_some() {
                awarded.push(badge);
            }
        }
        Ok(awarded)
    }

    /// Feature or unfeature one of the user's badges. Featuring a badge
    /// unfeatures the others in the same transaction.
    ///
    /// Returns `None` if the user does not hold `user_badge_id`.
    pub async fn set_featured(
        pool: &PgPool,
        user_id: DbId,
        user_badge_id: DbId,
        is_featured: bool,
    ) -> Result<Option<UserBadge>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        ProfileRepo::lock_on(&mut tx, user_id).await?;

        if is_featured {
            sqlx::query(
                "UPDATE user_badges SET is_featured = FALSE \
                 WHERE user_id = $1 AND is_featured AND id <> $2",
            )
            .bind(user_id)
            .bind(user_badge_id)
            .execute(&mut *tx)
            .await?;
        }

        let query = format!(
            "UPDATE user_badges SET is_featured = $3 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {USER_BADGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserBadge>(&query)
            .bind(user_badge_id)
            .bind(user_id)
            .bind(is_featured)
            .fetch_optional(&mut *tx)
            .await?;

        if row.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }
        tx.commit().await?;
        Ok(row)
    }
}
