//! Repository for the `profiles` table.

use sqlx::{PgConnection, PgPool};
use fait_core::types::DbId;

use crate::models::points::PointsAward;
use crate::models::profile::{Profile, UpsertProfile};
use crate::repositories::PointsRepo;

/// Column list for `profiles` queries.
const COLUMNS: &str = "\
    id, role, full_name, email, phone, address, city, state, zip_code, \
    avatar_url, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a profile for an auth subject with the given role.
    pub async fn create(
        pool: &PgPool,
        id: DbId,
        role: &str,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert_on(&mut conn, id, role, input).await
    }

    /// Insert a profile and credit `award` to it in one transaction.
    pub async fn create_with_award(
        pool: &PgPool,
        id: DbId,
        role: &str,
        input: &UpsertProfile,
        award: &PointsAward,
    ) -> Result<Profile, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let profile = Self::insert_on(&mut tx, id, role, input).await?;
        PointsRepo::award_on(&mut tx, profile.id, award, None).await?;
        tx.commit().await?;
        Ok(profile)
    }

    async fn insert_on(
        conn: &mut PgConnection,
        id: DbId,
        role: &str,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles \
                (id, role, full_name, email, phone, address, city, state, zip_code, avatar_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(role)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.avatar_url)
            .fetch_one(conn)
            .await
    }

    /// Lock the profile row until the caller's transaction ends.
    ///
    /// Returns `false` if the profile does not exist.
    pub(crate) async fn lock_on(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(row.is_some())
    }

    /// Stored role of a profile, if the profile exists.
    pub async fn find_role(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(role,)| role))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the contact fields. Optional fields left out are kept.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpsertProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                full_name = $2, \
                email = $3, \
                phone = COALESCE($4, phone), \
                address = COALESCE($5, address), \
                city = COALESCE($6, city), \
                state = COALESCE($7, state), \
                zip_code = COALESCE($8, zip_code), \
                avatar_url = COALESCE($9, avatar_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.zip_code)
            .bind(&input.avatar_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("UPDATE profiles SET role = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// List profiles, optionally filtered by role, ordered by name.
    pub async fn list(
        pool: &PgPool,
        role: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles \
             WHERE ($1::TEXT IS NULL OR role = $1) \
             ORDER BY full_name, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
