//! Repository for the `contractor_verifications` table.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::points::PointsAward;
use crate::models::verification::{ContractorVerification, SubmitVerification};
use crate::repositories::PointsRepo;

/// Column list for `contractor_verifications` queries.
const COLUMNS: &str = "\
    id, contractor_id, license_number, license_type, license_expiry, \
    insurance_provider, insurance_expiry, background_check_status, \
    background_check_date, background_check_candidate_id, is_verified, \
    admin_verified, admin_verified_at, rejection_reason, created_at, updated_at";

/// Outcome of [`VerificationRepo::record_decision`].
#[derive(Debug)]
pub struct RecordedDecision {
    pub verification: ContractorVerification,
    /// Whether this decision credited the approval bonus.
    pub bonus_awarded: bool,
}

/// Provides operations for contractor verification records.
pub struct VerificationRepo;

impl VerificationRepo {
    /// Create or replace the contractor's license and insurance details.
    ///
    /// Resubmitting clears any previous admin decision so the record returns
    /// to the review queue. Background check state is kept.
    pub async fn submit(
        pool: &PgPool,
        contractor_id: DbId,
        input: &SubmitVerification,
    ) -> Result<ContractorVerification, sqlx::Error> {
        let query = format!(
            "INSERT INTO contractor_verifications \
                (contractor_id, license_number, license_type, license_expiry, \
                 insurance_provider, insurance_expiry) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (contractor_id) DO UPDATE SET \
                license_number = EXCLUDED.license_number, \
                license_type = EXCLUDED.license_type, \
                license_expiry = EXCLUDED.license_expiry, \
                insurance_provider = EXCLUDED.insurance_provider, \
                insurance_expiry = EXCLUDED.insurance_expiry, \
                is_verified = FALSE, \
                admin_verified = FALSE, \
                admin_verified_at = NULL, \
                rejection_reason = NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractorVerification>(&query)
            .bind(contractor_id)
            .bind(&input.license_number)
            .bind(&input.license_type)
            .bind(input.license_expiry)
            .bind(&input.insurance_provider)
            .bind(input.insurance_expiry)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_contractor(
        pool: &PgPool,
        contractor_id: DbId,
    ) -> Result<Option<ContractorVerification>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM contractor_verifications WHERE contractor_id = $1");
        sqlx::query_as::<_, ContractorVerification>(&query)
            .bind(contractor_id)
            .fetch_optional(pool)
            .await
    }

    /// Admin review queue, oldest submissions first.
    pub async fn list(
        pool: &PgPool,
        is_verified: Option<bool>,
        background_check_status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContractorVerification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contractor_verifications \
             WHERE ($1::BOOLEAN IS NULL OR is_verified = $1) \
               AND ($2::TEXT IS NULL OR background_check_status = $2) \
             ORDER BY created_at ASC, id ASC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ContractorVerification>(&query)
            .bind(is_verified)
            .bind(background_check_status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record an admin decision.
    ///
    /// The record is locked for the duration. The first approval of a
    /// contractor credits `approval_award` in the same transaction; later
    /// approvals, including after a resubmission, do not. Returns `None` if
    /// the contractor has no verification record.
    pub async fn record_decision(
        pool: &PgPool,
        contractor_id: DbId,
        is_verified: bool,
        rejection_reason: Option<&str>,
        approval_award: &PointsAward,
    ) -> Result<Option<RecordedDecision>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let row: Option<(bool,)> = sqlx::query_as(
            "SELECT approval_bonus_awarded FROM contractor_verifications \
             WHERE contractor_id = $1 FOR UPDATE",
        )
        .bind(contractor_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((already_awarded,)) = row else {
            return Ok(None);
        };
        let bonus_awarded = is_verified && !already_awarded;

        let query = format!(
            "UPDATE contractor_verifications SET \
                is_verified = $2, \
                admin_verified = $2, \
                admin_verified_at = NOW(), \
                rejection_reason = $3, \
                approval_bonus_awarded = approval_bonus_awarded OR $4 \
             WHERE contractor_id = $1 \
             RETURNING {COLUMNS}"
        );
        let verification = sqlx::query_as::<_, ContractorVerification>(&query)
            .bind(contractor_id)
            .bind(is_verified)
            .bind(rejection_reason)
            .bind(bonus_awarded)
            .fetch_one(&mut *tx)
            .await?;

        if bonus_awarded {
            PointsRepo::award_on(&mut tx, contractor_id, approval_award, None).await?;
        }

        tx.commit().await?;
        Ok(Some(RecordedDecision {
            verification,
            bonus_awarded,
        }))
    }

    /// Move the background check from `from_status` to `to_status`, stamping
    /// the check date. A candidate id, when given, replaces the stored one.
    /// Returns `None` if the record no longer has `from_status`.
    pub async fn transition_background_check(
        pool: &PgPool,
        contractor_id: DbId,
        from_status: &str,
        to_status: &str,
        candidate_id: Option<&str>,
    ) -> Result<Option<ContractorVerification>, sqlx::Error> {
        let query = format!(
            "UPDATE contractor_verifications SET \
                background_check_status = $3, \
                background_check_date = NOW(), \
                background_check_candidate_id = COALESCE($4, background_check_candidate_id) \
             WHERE contractor_id = $1 AND background_check_status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContractorVerification>(&query)
            .bind(contractor_id)
            .bind(from_status)
            .bind(to_status)
            .bind(candidate_id)
            .fetch_optional(pool)
            .await
    }
}
