//! Governance proposal and vote models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use fait_core::governance::{VoteChoice, VoteTally};
use fait_core::types::{DbId, Timestamp};

/// A row from the `governance_proposals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GovernanceProposal {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub created_by: DbId,
    pub ends_at: Timestamp,
    pub min_points_required: i32,
    pub votes_for: i32,
    pub votes_against: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl GovernanceProposal {
    pub fn tally(&self) -> VoteTally {
        VoteTally::new(self.votes_for, self.votes_against)
    }
}

/// Request body for opening a proposal.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProposal {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    pub category: String,
    /// Defaults to 7 days.
    pub duration_days: Option<i64>,
    /// Defaults to 100 points.
    #[validate(range(min = 0))]
    pub min_points_required: Option<i32>,
}

/// A row from the `governance_votes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GovernanceVote {
    pub id: DbId,
    pub proposal_id: DbId,
    pub user_id: DbId,
    pub vote: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for casting (or changing) a vote.
#[derive(Debug, Clone, Deserialize)]
pub struct CastVote {
    pub vote: VoteChoice,
}

/// Result of a vote cast: the updated proposal and the caller's vote.
#[derive(Debug, Clone, Serialize)]
pub struct VoteOutcome {
    pub proposal: GovernanceProposal,
    pub vote: GovernanceVote,
}

/// Query parameters for listing proposals.
#[derive(Debug, Deserialize)]
pub struct ProposalListParams {
    pub status: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
