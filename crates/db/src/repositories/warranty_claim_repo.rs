//! Repository for the `warranty_claims` table.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::warranty_claim::{CreateWarrantyClaim, WarrantyClaim};

/// Column list for `warranty_claims` queries.
const COLUMNS: &str = "\
    id, booking_id, client_id, contractor_id, description, status, \
    resolution_notes, photo_urls, resolved_by, resolved_at, created_at, updated_at";

/// Provides CRUD operations for warranty claims.
pub struct WarrantyClaimRepo;

impl WarrantyClaimRepo {
    /// File a claim. One claim per booking (`uq_warranty_claims_booking_id`).
    pub async fn create(
        pool: &PgPool,
        client_id: DbId,
        contractor_id: DbId,
        input: &CreateWarrantyClaim,
    ) -> Result<WarrantyClaim, sqlx::Error> {
        let query = format!(
            "INSERT INTO warranty_claims \
                (booking_id, client_id, contractor_id, description, photo_urls) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WarrantyClaim>(&query)
            .bind(input.booking_id)
            .bind(client_id)
            .bind(contractor_id)
            .bind(input.description.trim())
            .bind(&input.photo_urls)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WarrantyClaim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM warranty_claims WHERE id = $1");
        sqlx::query_as::<_, WarrantyClaim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Claims visible to a user (as client or contractor), or every claim
    /// when `user_id` is `None`. Newest first.
    pub async fn list(
        pool: &PgPool,
        user_id: Option<DbId>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WarrantyClaim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM warranty_claims \
             WHERE ($1::BIGINT IS NULL OR client_id = $1 OR contractor_id = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, WarrantyClaim>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Move a claim from `from_status` to `to_status`.
    ///
    /// When `closed_by` is given the resolver and time are stamped. Notes
    /// replace the previous notes only when provided. Returns `None` if the
    /// claim no longer has `from_status`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from_status: &str,
        to_status: &str,
        resolution_notes: Option<&str>,
        closed_by: Option<DbId>,
    ) -> Result<Option<WarrantyClaim>, sqlx::Error> {
        let query = format!(
            "UPDATE warranty_claims SET \
                status = $3, \
                resolution_notes = COALESCE($4, resolution_notes), \
                resolved_by = COALESCE($5, resolved_by), \
                resolved_at = CASE WHEN $5::BIGINT IS NULL THEN resolved_at ELSE NOW() END \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WarrantyClaim>(&query)
            .bind(id)
            .bind(from_status)
            .bind(to_status)
            .bind(resolution_notes)
            .bind(closed_by)
            .fetch_optional(pool)
            .await
    }
}
