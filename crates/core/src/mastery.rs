//! Mastery levels and progress-to-next-level math.
//!
//! A contractor's overall mastery score maps onto five ordered levels. Below
//! 1000 the bands are fixed; from 1000 upwards progress is shown against the
//! next multiple of 500.

use std::fmt;

use serde::Serialize;

/// Score at which each level after Apprentice begins.
pub const JOURNEYMAN_THRESHOLD: i64 = 100;
pub const CRAFTSMAN_THRESHOLD: i64 = 300;
pub const MASTER_THRESHOLD: i64 = 600;
pub const GRANDMASTER_THRESHOLD: i64 = 1000;

/// Band width used above [`GRANDMASTER_THRESHOLD`].
pub const GRANDMASTER_STEP: i64 = 500;

/// Named mastery level, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum MasteryLevel {
    Apprentice,
    Journeyman,
    Craftsman,
    Master,
    Grandmaster,
}

impl MasteryLevel {
    /// Level for an overall score. Negative scores count as zero.
    pub fn from_score(score: i64) -> Self {
        match score.max(0) {
            s if s < JOURNEYMAN_THRESHOLD => Self::Apprentice,
            s if s < CRAFTSMAN_THRESHOLD => Self::Journeyman,
            s if s < MASTER_THRESHOLD => Self::Craftsman,
            s if s < GRANDMASTER_THRESHOLD => Self::Master,
            _ => Self::Grandmaster,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Apprentice => "Apprentice",
            Self::Journeyman => "Journeyman",
            Self::Craftsman => "Craftsman",
            Self::Master => "Master",
            Self::Grandmaster => "Grandmaster",
        }
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a score sits inside its level band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level: MasteryLevel,
    pub previous_threshold: i64,
    pub next_threshold: i64,
    /// Always within `[0, 100]`.
    pub progress_percent: f64,
}

/// Compute level, band bounds and progress for an overall score.
pub fn level_progress(score: i64) -> LevelProgress {
    let score = score.max(0);
    let level = MasteryLevel::from_score(score);

    let (previous_threshold, next_threshold) = match level {
        MasteryLevel::Apprentice => (0, JOURNEYMAN_THRESHOLD),
        MasteryLevel::Journeyman => (JOURNEYMAN_THRESHOLD, CRAFTSMAN_THRESHOLD),
        MasteryLevel::Craftsman => (CRAFTSMAN_THRESHOLD, MASTER_THRESHOLD),
        MasteryLevel::Master => (MASTER_THRESHOLD, GRANDMASTER_THRESHOLD),
        MasteryLevel::Grandmaster => {
            let floor = score - score % GRANDMASTER_STEP;
            (floor, floor.saturating_add(GRANDMASTER_STEP))
        }
    };

    let span = (next_threshold - previous_threshold) as f64;
    let raw = (score - previous_threshold) as f64 / span * 100.0;

    LevelProgress {
        level,
        previous_threshold,
        next_threshold,
        progress_percent: raw.clamp(0.0, 100.0),
    }
}

/// Overall score as the sum of its three components.
pub fn overall_score(skill: i32, communication: i32, reliability: i32) -> i32 {
    skill
        .saturating_add(communication)
        .saturating_add(reliability)
}
