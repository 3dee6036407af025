//! Handlers for the points ledger and leaderboard.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fait_core::error::CoreError;
use fait_core::event_types::POINTS_AWARDED;
use fait_core::points::{validate_amount, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_db::models::points::{AwardPoints, PointsListParams, PointsSummary, SpendPoints};
use fait_db::repositories::{PointsRepo, ProfileRepo, SpendResult};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::badges::award_earned_badges;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("A description is required".into()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GET /points/me
// ---------------------------------------------------------------------------

pub async fn get_my_points(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let totals = PointsRepo::totals(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: PointsSummary::from(totals),
    }))
}

// ---------------------------------------------------------------------------
// GET /points/me/transactions
// ---------------------------------------------------------------------------

pub async fn list_my_transactions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PointsListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let transactions = PointsRepo::list_for_user(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: transactions }))
}

// ---------------------------------------------------------------------------
// POST /points/spend
// ---------------------------------------------------------------------------

/// Spend points. Rejected with 403 when the balance is too low.
pub async fn spend_points(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SpendPoints>,
) -> AppResult<impl IntoResponse> {
    validate_amount(input.points_amount)?;
    validate_description(&input.description)?;

    match PointsRepo::spend(
        &state.pool,
        auth.user_id,
        input.points_amount,
        input.description.trim(),
    )
    .await?
    {
        SpendResult::Spent(transaction) => {
            tracing::info!(
                user_id = auth.user_id,
                points = transaction.points_amount,
                "Points spent",
            );
            Ok((StatusCode::CREATED, Json(DataResponse { data: transaction })))
        }
        SpendResult::Insufficient { balance } => Err(CoreError::InsufficientPoints {
            required: i64::from(input.points_amount),
            balance,
        }
        .into()),
    }
}

// ---------------------------------------------------------------------------
// POST /admin/points/award
// ---------------------------------------------------------------------------

pub async fn award_points(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AwardPoints>,
) -> AppResult<impl IntoResponse> {
    validate_amount(input.points_amount)?;
    validate_description(&input.description)?;

    ProfileRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", input.user_id))?;

    let transaction = PointsRepo::award(
        &state.pool,
        input.user_id,
        input.points_amount,
        input.description.trim(),
        None,
    )
    .await?;

    tracing::info!(
        user_id = input.user_id,
        points = input.points_amount,
        admin_id = admin.user_id,
        "Points awarded",
    );
    state.event_bus.publish(
        PlatformEvent::new(POINTS_AWARDED)
            .with_source("points_transaction", transaction.id)
            .with_actor(admin.user_id)
            .for_users(&[input.user_id], &transaction),
    );
    award_earned_badges(&state, input.user_id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: transaction })))
}

// ---------------------------------------------------------------------------
// GET /points/leaderboard
// ---------------------------------------------------------------------------

pub async fn leaderboard(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT);
    let entries = PointsRepo::leaderboard(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: entries }))
}
