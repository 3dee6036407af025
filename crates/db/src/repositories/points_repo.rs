//! Repository for the `points_transactions` ledger.

use sqlx::{PgConnection, PgPool};
use fait_core::points::{TYPE_EARNED, TYPE_SPENT};
use fait_core::types::DbId;

use crate::models::points::{
    LeaderboardEntry, NewPointsTransaction, PointsAward, PointsTotals, PointsTransaction,
};

/// Column list for `points_transactions` queries.
const COLUMNS: &str = "\
    id, user_id, points_amount, transaction_type, description, booking_id, \
    created_at, updated_at";

/// Earned and spent sums for one user (`$1`).
const TOTALS_QUERY: &str = "\
    SELECT \
        COALESCE(SUM(points_amount) FILTER (WHERE transaction_type = 'earned'), 0)::BIGINT AS earned, \
        COALESCE(SUM(points_amount) FILTER (WHERE transaction_type = 'spent'), 0)::BIGINT AS spent \
    FROM points_transactions WHERE user_id = $1";

/// Outcome of [`PointsRepo::spend`].
#[derive(Debug)]
pub enum SpendResult {
    Spent(PointsTransaction),
    /// The balance at the time of the attempt was too low.
    Insufficient { balance: i64 },
}

/// Provides operations on the points ledger.
pub struct PointsRepo;

impl PointsRepo {
    /// Append a ledger row.
    pub async fn insert(
        pool: &PgPool,
        input: &NewPointsTransaction,
    ) -> Result<PointsTransaction, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert_on(&mut conn, input).await
    }

    /// Credit points to a user.
    pub async fn award(
        pool: &PgPool,
        user_id: DbId,
        points_amount: i32,
        description: &str,
        booking_id: Option<DbId>,
    ) -> Result<PointsTransaction, sqlx::Error> {
        Self::insert(
            pool,
            &NewPointsTransaction {
                user_id,
                points_amount,
                transaction_type: TYPE_EARNED,
                description: description.to_string(),
                booking_id,
            },
        )
        .await
    }

    /// Debit points if the balance allows it.
    pub async fn spend(
        pool: &PgPool,
        user_id: DbId,
        points_amount: i32,
        description: &str,
    ) -> Result<SpendResult, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = Self::spend_on(&mut tx, user_id, points_amount, description).await?;
        match result {
            SpendResult::Spent(_) => tx.commit().await?,
            SpendResult::Insufficient { .. } => tx.rollback().await?,
        }
        Ok(result)
    }

    pub(crate) async fn insert_on(
        conn: &mut PgConnection,
        input: &NewPointsTransaction,
    ) -> Result<PointsTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO points_transactions \
                (user_id, points_amount, transaction_type, description, booking_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PointsTransaction>(&query)
            .bind(input.user_id)
            .bind(input.points_amount)
            .bind(input.transaction_type)
            .bind(&input.description)
            .bind(input.booking_id)
            .fetch_one(conn)
            .await
    }

    /// Credit `award` to a user on an open transaction.
    pub(crate) async fn award_on(
        conn: &mut PgConnection,
        user_id: DbId,
        award: &PointsAward,
        booking_id: Option<DbId>,
    ) -> Result<PointsTransaction, sqlx::Error> {
        Self::insert_on(
            conn,
            &NewPointsTransaction {
                user_id,
                points_amount: award.points_amount,
                transaction_type: TYPE_EARNED,
                description: award.description.to_string(),
                booking_id,
            },
        )
        .await
    }

    /// Lock the user's profile row, check the balance and debit it on an
    /// open transaction. Concurrent spends by the same user are serialised
    /// by the row lock until the caller commits.
    pub(crate) async fn spend_on(
        conn: &mut PgConnection,
        user_id: DbId,
        points_amount: i32,
        description: &str,
    ) -> Result<SpendResult, sqlx::Error> {
        sqlx::query("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;

        let totals = sqlx::query_as::<_, PointsTotals>(TOTALS_QUERY)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        let balance = totals.balance();
        if balance < i64::from(points_amount) {
            return Ok(SpendResult::Insufficient { balance });
        }

        let query = format!(
            "INSERT INTO points_transactions \
                (user_id, points_amount, transaction_type, description) \
             VALUES ($1, $2, '{TYPE_SPENT}', $3) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PointsTransaction>(&query)
            .bind(user_id)
            .bind(points_amount)
            .bind(description)
            .fetch_one(&mut *conn)
            .await?;
        Ok(SpendResult::Spent(row))
    }

    pub async fn totals(pool: &PgPool, user_id: DbId) -> Result<PointsTotals, sqlx::Error> {
        sqlx::query_as::<_, PointsTotals>(TOTALS_QUERY)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Current balance (earned minus spent).
    pub async fn balance(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        Ok(Self::totals(pool, user_id).await?.balance())
    }

    /// Ledger of a user, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PointsTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM points_transactions WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, PointsTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Top users by balance. Ties are broken by profile id.
    pub async fn leaderboard(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardEntry>(
            "SELECT p.id AS user_id, p.full_name, p.role, \
                    COALESCE(SUM(CASE WHEN t.transaction_type = 'earned' \
                                      THEN t.points_amount ELSE -t.points_amount END), 0)::BIGINT \
                        AS balance \
             FROM profiles p \
             LEFT JOIN points_transactions t ON t.user_id = p.id \
             GROUP BY p.id, p.full_name, p.role \
             ORDER BY balance DESC, p.id ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
