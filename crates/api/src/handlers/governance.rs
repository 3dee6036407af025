//! Handlers for governance proposals and votes.
//!
//! Opening a proposal and voting are gated on the caller's points balance.
//! Votes are recorded transactionally by [`GovernanceRepo::cast_vote`];
//! changing a vote moves one unit between the counters.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Serialize;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::event_types::{PROPOSAL_CLOSED, PROPOSAL_CREATED, VOTE_CAST};
use fait_core::governance::{
    self, check_can_propose, check_can_vote, validate_category, validate_duration_days,
    DEFAULT_DURATION_DAYS, DEFAULT_MIN_POINTS_TO_VOTE,
};
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_db::models::governance::{
    CastVote, CreateProposal, GovernanceProposal, GovernanceVote, ProposalListParams,
};
use fait_db::repositories::{CastVoteResult, GovernanceRepo, PointsRepo};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A proposal together with the caller's current vote.
#[derive(Debug, Serialize)]
pub struct ProposalDetail {
    #[serde(flatten)]
    pub proposal: GovernanceProposal,
    pub my_vote: Option<GovernanceVote>,
}

async fn find_proposal(state: &AppState, id: DbId) -> AppResult<GovernanceProposal> {
    let proposal = GovernanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("GovernanceProposal", id))?;
    Ok(proposal)
}

// ---------------------------------------------------------------------------
// GET /governance/proposals
// ---------------------------------------------------------------------------

pub async fn list_proposals(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProposalListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        governance::validate_status(s)?;
    }
    if let Some(ref c) = params.category {
        validate_category(c)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let proposals = GovernanceRepo::list(
        &state.pool,
        params.status.as_deref(),
        params.category.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: proposals }))
}

// ---------------------------------------------------------------------------
// POST /governance/proposals
// ---------------------------------------------------------------------------

pub async fn create_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProposal>,
) -> AppResult<impl IntoResponse> {
    if !auth.permissions().can_create_proposals {
        return Err(CoreError::Forbidden("Your role cannot open proposals".into()).into());
    }
    input.validate()?;
    validate_category(&input.category)?;
    let duration_days = input.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
    validate_duration_days(duration_days)?;

    let balance = PointsRepo::balance(&state.pool, auth.user_id).await?;
    check_can_propose(balance)?;

    let proposal = GovernanceRepo::create(
        &state.pool,
        auth.user_id,
        input.title.trim(),
        input.description.trim(),
        &input.category,
        Utc::now() + Duration::days(duration_days),
        input.min_points_required.unwrap_or(DEFAULT_MIN_POINTS_TO_VOTE),
    )
    .await?;

    tracing::info!(
        proposal_id = proposal.id,
        created_by = auth.user_id,
        category = %proposal.category,
        "Proposal opened",
    );
    state.event_bus.publish(
        PlatformEvent::new(PROPOSAL_CREATED)
            .with_source("governance_proposal", proposal.id)
            .with_actor(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: proposal })))
}

// ---------------------------------------------------------------------------
// GET /governance/proposals/{id}
// ---------------------------------------------------------------------------

pub async fn get_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let proposal = find_proposal(&state, id).await?;
    let my_vote = GovernanceRepo::find_vote(&state.pool, id, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: ProposalDetail { proposal, my_vote },
    }))
}

// ---------------------------------------------------------------------------
// POST /governance/proposals/{id}/vote
// ---------------------------------------------------------------------------

/// Cast or change a vote. Re-submitting the same choice is a no-op.
pub async fn cast_vote(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CastVote>,
) -> AppResult<impl IntoResponse> {
    if !auth.permissions().can_vote {
        return Err(CoreError::Forbidden("Your role cannot vote".into()).into());
    }

    let proposal = find_proposal(&state, id).await?;
    let balance = PointsRepo::balance(&state.pool, auth.user_id).await?;
    check_can_vote(balance, proposal.min_points_required)?;

    let outcome = match GovernanceRepo::cast_vote(&state.pool, id, auth.user_id, input.vote).await? {
        CastVoteResult::Recorded(outcome) => outcome,
        CastVoteResult::NotFound => {
            return Err(CoreError::not_found("GovernanceProposal", id).into())
        }
        CastVoteResult::Rejected(err) => return Err(err.into()),
    };

    tracing::info!(
        proposal_id = id,
        user_id = auth.user_id,
        vote = input.vote.as_str(),
        votes_for = outcome.proposal.votes_for,
        votes_against = outcome.proposal.votes_against,
        "Vote recorded",
    );
    state.event_bus.publish(
        PlatformEvent::new(VOTE_CAST)
            .with_source("governance_proposal", id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// POST /governance/proposals/{id}/close
// ---------------------------------------------------------------------------

/// Decide the outcome. Admins may close at any time; the creator only once
/// the voting period has ended.
pub async fn close_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let proposal = find_proposal(&state, id).await?;
    let is_creator = proposal.created_by == auth.user_id;
    if !auth.is_admin() {
        if !is_creator {
            return Err(CoreError::Forbidden(
                "Only the creator or an admin can close a proposal".into(),
            )
            .into());
        }
        if Utc::now() < proposal.ends_at {
            return Err(CoreError::Conflict("Voting period has not ended yet".into()).into());
        }
    }
    if proposal.status != governance::STATUS_ACTIVE {
        return Err(CoreError::Conflict(format!(
            "Proposal is already '{}'",
            proposal.status
        ))
        .into());
    }

    let closed = GovernanceRepo::close(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("GovernanceProposal", id))?;

    tracing::info!(
        proposal_id = id,
        status = %closed.status,
        votes_for = closed.votes_for,
        votes_against = closed.votes_against,
        "Proposal closed",
    );
    state.event_bus.publish(
        PlatformEvent::new(PROPOSAL_CLOSED)
            .with_source("governance_proposal", id)
            .with_actor(auth.user_id)
            .for_users(&[closed.created_by], &closed),
    );

    Ok(Json(DataResponse { data: closed }))
}
