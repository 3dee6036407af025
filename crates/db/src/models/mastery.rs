//! Mastery score model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::mastery::{level_progress, LevelProgress};
use fait_core::types::{DbId, Timestamp};

/// A row from the `mastery_scores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MasteryScore {
    pub id: DbId,
    pub profile_id: DbId,
    pub skill_score: i32,
    pub communication_score: i32,
    pub reliability_score: i32,
    pub overall_score: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Admin update of component scores. Missing components keep their value.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMasteryScore {
    #[validate(range(min = 0))]
    pub skill_score: Option<i32>,
    #[validate(range(min = 0))]
    pub communication_score: Option<i32>,
    #[validate(range(min = 0))]
    pub reliability_score: Option<i32>,
}

/// Score with its level band, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct MasteryView {
    pub profile_id: DbId,
    pub skill_score: i32,
    pub communication_score: i32,
    pub reliability_score: i32,
    pub overall_score: i32,
    #[serde(flatten)]
    pub progress: LevelProgress,
}

impl MasteryView {
    /// View for a profile without a stored score (all zeros).
    pub fn empty(profile_id: DbId) -> Self {
        Self {
            profile_id,
            skill_score: 0,
            communication_score: 0,
            reliability_score: 0,
            overall_score: 0,
            progress: level_progress(0),
        }
    }
}

impl From<MasteryScore> for MasteryView {
    fn from(m: MasteryScore) -> Self {
        Self {
            profile_id: m.profile_id,
            skill_score: m.skill_score,
            communication_score: m.communication_score,
            reliability_score: m.reliability_score,
            overall_score: m.overall_score,
            progress: level_progress(i64::from(m.overall_score)),
        }
    }
}
