//! Repository for the `mastery_scores` table.

use sqlx::PgPool;
use fait_core::types::DbId;

use crate::models::mastery::MasteryScore;

/// Column list for `mastery_scores` queries.
const COLUMNS: &str = "\
    id, profile_id, skill_score, communication_score, reliability_score, \
    overall_score, created_at, updated_at";

/// Provides operations for mastery scores.
pub struct MasteryRepo;

impl MasteryRepo {
    pub async fn find_by_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Option<MasteryScore>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM mastery_scores WHERE profile_id = $1");
        sqlx::query_as::<_, MasteryScore>(&query)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite all components of a profile's score.
    pub async fn upsert(
        pool: &PgPool,
        profile_id: DbId,
        skill_score: i32,
        communication_score: i32,
        reliability_score: i32,
        overall_score: i32,
    ) -> Result<MasteryScore, sqlx::Error> {
        let query = format!(
            "INSERT INTO mastery_scores \
                (profile_id, skill_score, communication_score, reliability_score, overall_score) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (profile_id) DO UPDATE SET \
                skill_score = EXCLUDED.skill_score, \
                communication_score = EXCLUDED.communication_score, \
                reliability_score = EXCLUDED.reliability_score, \
                overall_score = EXCLUDED.overall_score \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MasteryScore>(&query)
            .bind(profile_id)
            .bind(skill_score)
            .bind(communication_score)
            .bind(reliability_score)
            .bind(overall_score)
            .fetch_one(pool)
            .await
    }

    /// Highest overall scores first.
    pub async fn top(pool: &PgPool, limit: i64) -> Result<Vec<MasteryScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM mastery_scores \
             ORDER BY overall_score DESC, profile_id ASC LIMIT $1"
        );
        sqlx::query_as::<_, MasteryScore>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
