//! Repository for the `service_packages` table.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::service_package::{
    CreateServicePackage, ServicePackage, UpdateServicePackage,
};

/// Column list for `service_packages` queries.
const COLUMNS: &str = "\
    id, contractor_id, title, description, price_cents, duration, \
    scope, exclusions, is_active, created_at, updated_at";

/// Provides CRUD operations for service packages.
pub struct ServicePackageRepo;

impl ServicePackageRepo {
    /// Create a package owned by `contractor_id`. Active unless stated otherwise.
    pub async fn create(
        pool: &PgPool,
        contractor_id: DbId,
        input: &CreateServicePackage,
    ) -> Result<ServicePackage, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_packages \
                (contractor_id, title, description, price_cents, duration, scope, exclusions, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, TRUE)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServicePackage>(&query)
            .bind(contractor_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.duration)
            .bind(&input.scope)
            .bind(&input.exclusions)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServicePackage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_packages WHERE id = $1");
        sqlx::query_as::<_, ServicePackage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List packages newest-first with optional contractor and activity filters.
    pub async fn list(
        pool: &PgPool,
        contractor_id: Option<DbId>,
        active_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ServicePackage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_packages \
             WHERE ($1::BIGINT IS NULL OR contractor_id = $1) \
               AND (NOT $2 OR is_active) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ServicePackage>(&query)
            .bind(contractor_id)
            .bind(active_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateServicePackage,
    ) -> Result<Option<ServicePackage>, sqlx::Error> {
        let query = format!(
            "UPDATE service_packages SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                price_cents = COALESCE($4, price_cents), \
                duration = COALESCE($5, duration), \
                scope = COALESCE($6, scope), \
                exclusions = COALESCE($7, exclusions), \
                is_active = COALESCE($8, is_active) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServicePackage>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(&input.duration)
            .bind(&input.scope)
            .bind(&input.exclusions)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a package. Fails with a FK violation while bookings reference it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_packages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
