//! Handlers for mastery scores and the caller's gamification summary.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::mastery::overall_score;
use fait_core::points::{DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT};
use fait_core::roles::Permissions;
use fait_core::search::clamp_limit;
use fait_core::types::DbId;
use fait_db::models::badge::UserBadgeDetail;
use fait_db::models::mastery::{MasteryView, UpdateMasteryScore};
use fait_db::models::points::PointsSummary;
use fait_db::repositories::{BadgeRepo, MasteryRepo, PointsRepo, ProfileRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Everything the client needs to render role-gated, gamified UI.
#[derive(Debug, Serialize)]
pub struct GamificationSummary {
    pub user_id: DbId,
    pub role: String,
    pub permissions: Permissions,
    pub mastery: MasteryView,
    pub points: PointsSummary,
    pub badges: Vec<UserBadgeDetail>,
}

async fn mastery_view(state: &AppState, profile_id: DbId) -> AppResult<MasteryView> {
    Ok(MasteryRepo::find_by_profile(&state.pool, profile_id)
        .await?
        .map(MasteryView::from)
        .unwrap_or_else(|| MasteryView::empty(profile_id)))
}

// ---------------------------------------------------------------------------
// GET /mastery/{profile_id}
// ---------------------------------------------------------------------------

/// Score components, level and progress. Profiles without a score yet
/// report zeros at the first level.
pub async fn get_mastery(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;

    let view = mastery_view(&state, profile_id).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// GET /mastery/top
// ---------------------------------------------------------------------------

pub async fn top_mastery(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LEADERBOARD_LIMIT, MAX_LEADERBOARD_LIMIT);
    let views: Vec<MasteryView> = MasteryRepo::top(&state.pool, limit)
        .await?
        .into_iter()
        .map(MasteryView::from)
        .collect();
    Ok(Json(DataResponse { data: views }))
}

// ---------------------------------------------------------------------------
// PUT /admin/mastery/{profile_id}
// ---------------------------------------------------------------------------

/// Set one or more components; the others keep their stored values and the
/// overall score is recomputed.
pub async fn update_mastery(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(profile_id): Path<DbId>,
    Json(input): Json<UpdateMasteryScore>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ProfileRepo::find_by_id(&state.pool, profile_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", profile_id))?;

    let current = mastery_view(&state, profile_id).await?;
    let skill = input.skill_score.unwrap_or(current.skill_score);
    let communication = input
        .communication_score
        .unwrap_or(current.communication_score);
    let reliability = input.reliability_score.unwrap_or(current.reliability_score);

    let score = MasteryRepo::upsert(
        &state.pool,
        profile_id,
        skill,
        communication,
        reliability,
        overall_score(skill, communication, reliability),
    )
    .await?;
    let view = MasteryView::from(score);

    tracing::info!(
        profile_id,
        overall = view.overall_score,
        level = %view.progress.level,
        admin_id = admin.user_id,
        "Mastery score updated",
    );
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// GET /gamification/me
// ---------------------------------------------------------------------------

pub async fn get_my_gamification(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let mastery = mastery_view(&state, auth.user_id).await?;
    let totals = PointsRepo::totals(&state.pool, auth.user_id).await?;
    let badges = BadgeRepo::list_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: GamificationSummary {
            user_id: auth.user_id,
            permissions: auth.permissions(),
            role: auth.role,
            mastery,
            points: PointsSummary::from(totals),
            badges,
        },
    }))
}
