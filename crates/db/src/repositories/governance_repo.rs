//! Repository for the `governance_proposals` and `governance_votes` tables.

use chrono::Utc;
use sqlx::PgPool;
use fait_core::error::CoreError;
use fait_core::governance::{apply_vote, check_open_for_voting, decide_outcome, VoteChoice, STATUS_ACTIVE};
use fait_core::types::{DbId, Timestamp};

use crate::models::governance::{GovernanceProposal, GovernanceVote, VoteOutcome};

/// Column list for `governance_proposals` queries.
const COLUMNS: &str = "\
    id, title, description, category, status, created_by, ends_at, \
    min_points_required, votes_for, votes_against, created_at, updated_at";

/// Column list for `governance_votes` queries.
const VOTE_COLUMNS: &str = "id, proposal_id, user_id, vote, created_at, updated_at";

/// Outcome of [`GovernanceRepo::cast_vote`].
#[derive(Debug)]
pub enum CastVoteResult {
    Recorded(VoteOutcome),
    NotFound,
    /// The proposal does not accept votes (closed or past its end time).
    Rejected(CoreError),
}

/// Provides operations for governance proposals and votes.
pub struct GovernanceRepo;

impl GovernanceRepo {
    /// Open a proposal in `active` status.
    pub async fn create(
        pool: &PgPool,
        created_by: DbId,
        title: &str,
        description: &str,
        category: &str,
        ends_at: Timestamp,
        min_points_required: i32,
    ) -> Result<GovernanceProposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO governance_proposals \
                (title, description, category, status, created_by, ends_at, min_points_required) \
             VALUES ($1, $2, $3, '{STATUS_ACTIVE}', $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(title)
            .bind(description)
            .bind(category)
            .bind(created_by)
            .bind(ends_at)
            .bind(min_points_required)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GovernanceProposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM governance_proposals WHERE id = $1");
        sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List proposals, those closing soonest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GovernanceProposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM governance_proposals \
             WHERE ($1::TEXT IS NULL OR status = $1) \
               AND ($2::TEXT IS NULL OR category = $2) \
             ORDER BY ends_at ASC, id ASC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(status)
            .bind(category)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_vote(
        pool: &PgPool,
        proposal_id: DbId,
        user_id: DbId,
    ) -> Result<Option<GovernanceVote>, sqlx::Error> {
        let query = format!(
            "SELECT {VOTE_COLUMNS} FROM governance_votes \
             WHERE proposal_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, GovernanceVote>(&query)
            .bind(proposal_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Cast or change a vote.
    ///
    /// Locks the proposal row, checks it is open, applies the tally reducer
    /// against the user's previous vote, upserts the vote and writes the
    /// counters, all in one transaction.
    pub async fn cast_vote(
        pool: &PgPool,
        proposal_id: DbId,
        user_id: DbId,
        choice: VoteChoice,
    ) -> Result<CastVoteResult, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM governance_proposals WHERE id = $1 FOR UPDATE");
        let Some(proposal) = sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(proposal_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(CastVoteResult::NotFound);
        };

        if let Err(e) = check_open_for_voting(&proposal.status, proposal.ends_at, Utc::now()) {
            return Ok(CastVoteResult::Rejected(e));
        }

        let previous: Option<String> = sqlx::query_scalar(
            "SELECT vote FROM governance_votes WHERE proposal_id = $1 AND user_id = $2",
        )
        .bind(proposal_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let previous = previous
            .as_deref()
            .map(VoteChoice::parse)
            .transpose()
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        let tally = apply_vote(proposal.tally(), previous, choice);

        let query = format!(
            "INSERT INTO governance_votes (proposal_id, user_id, vote) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (proposal_id, user_id) DO UPDATE SET vote = EXCLUDED.vote \
             RETURNING {VOTE_COLUMNS}"
        );
        let vote = sqlx::query_as::<_, GovernanceVote>(&query)
            .bind(proposal_id)
            .bind(user_id)
            .bind(choice.as_str())
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE governance_proposals SET votes_for = $2, votes_against = $3 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let proposal = sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(proposal_id)
            .bind(tally.votes_for)
            .bind(tally.votes_against)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CastVoteResult::Recorded(VoteOutcome { proposal, vote }))
    }

    /// Close an active proposal, deciding passed/failed from its tally.
    ///
    /// Returns the row unchanged if it was no longer active.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GovernanceProposal>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM governance_proposals WHERE id = $1 FOR UPDATE");
        let Some(proposal) = sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if proposal.status != STATUS_ACTIVE {
            tx.commit().await?;
            return Ok(Some(proposal));
        }

        let outcome = decide_outcome(proposal.tally());
        let query =
            format!("UPDATE governance_proposals SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let closed = sqlx::query_as::<_, GovernanceProposal>(&query)
            .bind(id)
            .bind(outcome)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(closed))
    }
}
