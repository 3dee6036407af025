//! Points ledger model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use fait_core::types::{DbId, Timestamp};

/// A row from the `points_transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointsTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub points_amount: i32,
    pub transaction_type: String,
    pub description: String,
    pub booking_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert row for the ledger.
#[derive(Debug, Clone)]
pub struct NewPointsTransaction {
    pub user_id: DbId,
    pub points_amount: i32,
    pub transaction_type: &'static str,
    pub description: String,
    pub booking_id: Option<DbId>,
}

/// A fixed credit applied in the same transaction as the write that
/// earns it.
#[derive(Debug, Clone, Copy)]
pub struct PointsAward {
    pub points_amount: i32,
    pub description: &'static str,
}

/// Request body for spending points.
#[derive(Debug, Clone, Deserialize)]
pub struct SpendPoints {
    pub points_amount: i32,
    pub description: String,
}

/// Admin manual credit.
#[derive(Debug, Clone, Deserialize)]
pub struct AwardPoints {
    pub user_id: DbId,
    pub points_amount: i32,
    pub description: String,
}

/// Earned/spent totals for a user.
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct PointsTotals {
    pub earned: i64,
    pub spent: i64,
}

impl PointsTotals {
    pub fn balance(&self) -> i64 {
        fait_core::points::balance(self.earned, self.spent)
    }
}

/// Summary returned by `GET /points/me`.
#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    pub earned: i64,
    pub spent: i64,
    pub balance: i64,
}

impl From<PointsTotals> for PointsSummary {
    fn from(t: PointsTotals) -> Self {
        Self {
            earned: t.earned,
            spent: t.spent,
            balance: t.balance(),
        }
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: DbId,
    pub full_name: String,
    pub role: String,
    pub balance: i64,
}

/// Query parameters for listing ledger entries or the leaderboard.
#[derive(Debug, Deserialize)]
pub struct PointsListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
