//! Repositories for the `reviews` and `external_reviews` tables.

use sqlx::{PgConnection, PgPool};
use fait_core::types::DbId;

use crate::models::points::PointsAward;
use crate::models::review::{ExternalReview, NewReview, RatingSummary, Review, UpsertExternalReview};
use crate::repositories::PointsRepo;

/// Column list for `reviews` queries.
const COLUMNS: &str = "\
    id, booking_id, client_id, contractor_id, service_package_id, rating, \
    comment, created_at, updated_at";

/// Column list for `external_reviews` queries.
const EXTERNAL_COLUMNS: &str =
    "id, contractor_id, platform, url, rating, review_count, created_at, updated_at";

/// Provides operations for platform reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review. A second review for the same booking violates
    /// `uq_reviews_booking_id`.
    pub async fn create(pool: &PgPool, input: &NewReview) -> Result<Review, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert_on(&mut conn, input).await
    }

    /// Insert a review and credit `award` to its author in one transaction.
    pub async fn create_with_award(
        pool: &PgPool,
        input: &NewReview,
        award: &PointsAward,
    ) -> Result<Review, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let review = Self::insert_on(&mut tx, input).await?;
        PointsRepo::award_on(&mut tx, review.client_id, award, Some(review.booking_id)).await?;
        tx.commit().await?;
        Ok(review)
    }

    async fn insert_on(conn: &mut PgConnection, input: &NewReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews \
                (booking_id, client_id, contractor_id, service_package_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.booking_id)
            .bind(input.client_id)
            .bind(input.contractor_id)
            .bind(input.service_package_id)
            .bind(input.rating)
            .bind(&input.comment)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_booking(
        pool: &PgPool,
        booking_id: DbId,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE booking_id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(booking_id)
            .fetch_optional(pool)
            .await
    }

    /// Reviews received by a contractor, newest first.
    pub async fn list_for_contractor(
        pool: &PgPool,
        contractor_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE contractor_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(contractor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Reviews of a single package, newest first.
    pub async fn list_for_package(
        pool: &PgPool,
        service_package_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reviews WHERE service_package_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(service_package_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count and average rating for a contractor. Average is `None` with
    /// no reviews.
    pub async fn rating_summary(
        pool: &PgPool,
        contractor_id: DbId,
    ) -> Result<RatingSummary, sqlx::Error> {
        sqlx::query_as::<_, RatingSummary>(
            "SELECT $1::BIGINT AS contractor_id, \
                    COUNT(*) AS review_count, \
                    AVG(rating)::DOUBLE PRECISION AS average_rating \
             FROM reviews WHERE contractor_id = $1",
        )
        .bind(contractor_id)
        .fetch_one(pool)
        .await
    }
}

/// Provides operations for reviews imported from external platforms.
pub struct ExternalReviewRepo;

impl ExternalReviewRepo {
    /// Insert or refresh the listing for `(contractor_id, platform)`.
    pub async fn upsert(
        pool: &PgPool,
        contractor_id: DbId,
        input: &UpsertExternalReview,
    ) -> Result<ExternalReview, sqlx::Error> {
        let query = format!(
            "INSERT INTO external_reviews (contractor_id, platform, url, rating, review_count) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (contractor_id, platform) DO UPDATE SET \
                url = EXCLUDED.url, \
                rating = EXCLUDED.rating, \
                review_count = EXCLUDED.review_count \
             RETURNING {EXTERNAL_COLUMNS}"
        );
        sqlx::query_as::<_, ExternalReview>(&query)
            .bind(contractor_id)
            .bind(&input.platform)
            .bind(&input.url)
            .bind(input.rating)
            .bind(input.review_count)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_contractor(
        pool: &PgPool,
        contractor_id: DbId,
    ) -> Result<Vec<ExternalReview>, sqlx::Error> {
        let query = format!(
            "SELECT {EXTERNAL_COLUMNS} FROM external_reviews \
             WHERE contractor_id = $1 ORDER BY platform"
        );
        sqlx::query_as::<_, ExternalReview>(&query)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a listing owned by `contractor_id`.
    pub async fn delete(pool: &PgPool, id: DbId, contractor_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM external_reviews WHERE id = $1 AND contractor_id = $2")
                .bind(id)
                .bind(contractor_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
