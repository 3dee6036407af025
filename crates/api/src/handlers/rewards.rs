//! Handlers for the rewards catalog and redemptions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::event_types::REWARD_REDEEMED;
use fait_core::reward::{reward_unavailable, validate_points_cost, validate_reward_name};
use fait_core::types::DbId;
use fait_db::models::badge::CatalogParams;
use fait_db::models::reward::{CreateReward, UpdateReward};
use fait_db::repositories::{RedeemResult, RewardRepo};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /rewards
// ---------------------------------------------------------------------------

/// The catalog, cheapest first. Inactive rewards are listed only for admins
/// who ask.
pub async fn list_rewards(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<impl IntoResponse> {
    let include_inactive = auth.is_admin() && params.include_inactive.unwrap_or(false);
    let rewards = RewardRepo::list(&state.pool, include_inactive).await?;
    Ok(Json(DataResponse { data: rewards }))
}

// ---------------------------------------------------------------------------
// GET /rewards/{id}
// ---------------------------------------------------------------------------

pub async fn get_reward(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reward = RewardRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|r| r.is_active || auth.is_admin())
        .ok_or_else(|| CoreError::not_found("Reward", id))?;
    Ok(Json(DataResponse { data: reward }))
}

// ---------------------------------------------------------------------------
// GET /rewards/me
// ---------------------------------------------------------------------------

pub async fn list_my_rewards(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let redemptions = RewardRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: redemptions }))
}

// ---------------------------------------------------------------------------
// POST /rewards/{id}/redeem
// ---------------------------------------------------------------------------

/// Spend the reward's cost from the caller's balance.
///
/// 403 when the balance is too low, 409 when the reward is inactive.
pub async fn redeem_reward(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let redemption = match RewardRepo::redeem(&state.pool, auth.user_id, id).await? {
        RedeemResult::Redeemed(redemption) => redemption,
        RedeemResult::NotFound => return Err(CoreError::not_found("Reward", id).into()),
        RedeemResult::Inactive => return Err(reward_unavailable().into()),
        RedeemResult::Insufficient {
            points_cost,
            balance,
        } => {
            return Err(CoreError::InsufficientPoints {
                required: i64::from(points_cost),
                balance,
            }
            .into())
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        reward_id = id,
        points = redemption.points_spent,
        "Reward redeemed",
    );
    state.event_bus.publish(
        PlatformEvent::new(REWARD_REDEEMED)
            .with_source("user_reward", redemption.id)
            .with_actor(auth.user_id)
            .for_users(&[auth.user_id], &redemption),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: redemption })))
}

// ---------------------------------------------------------------------------
// POST /admin/rewards
// ---------------------------------------------------------------------------

pub async fn create_reward(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateReward>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_reward_name(&input.name)?;
    validate_points_cost(input.points_cost)?;

    let reward = RewardRepo::create(&state.pool, &input).await?;
    tracing::info!(
        reward_id = reward.id,
        points_cost = reward.points_cost,
        admin_id = admin.user_id,
        "Reward created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: reward })))
}

// ---------------------------------------------------------------------------
// PUT /admin/rewards/{id}
// ---------------------------------------------------------------------------

pub async fn update_reward(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReward>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(name) = &input.name {
        validate_reward_name(name)?;
    }
    if let Some(points_cost) = input.points_cost {
        validate_points_cost(points_cost)?;
    }

    let reward = RewardRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Reward", id))?;
    tracing::info!(reward_id = id, admin_id = admin.user_id, "Reward updated");
    Ok(Json(DataResponse { data: reward }))
}
