//! Handlers for the badge catalog and the caller's badges.
//!
//! Badges are awarded by [`award_earned_badges`], which handlers call after
//! any write that can move a criterion (points earned, bookings completed,
//! reviews written).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::badge::{validate_badge_name, validate_criterion, validate_threshold};
use fait_core::error::CoreError;
use fait_core::event_types::BADGE_AWARDED;
use fait_core::types::DbId;
use fait_db::models::badge::{Badge, CatalogParams, CreateBadge, SetFeaturedBadge};
use fait_db::repositories::BadgeRepo;
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

fn announce(state: &AppState, user_id: DbId, awarded: &[Badge]) {
    for badge in awarded {
        tracing::info!(user_id, badge_id = badge.id, badge = %badge.name, "Badge awarded");
        state.event_bus.publish(
            PlatformEvent::new(BADGE_AWARDED)
                .with_source("badge", badge.id)
                .with_actor(user_id)
                .for_users(&[user_id], badge),
        );
    }
}

/// Award any badges `user_id` has newly earned. Failures are logged and
/// swallowed: the triggering write has already committed and the next
/// check picks the badge up.
pub(crate) async fn award_earned_badges(state: &AppState, user_id: DbId) {
    match BadgeRepo::award_earned(&state.pool, user_id).await {
        Ok(awarded) => announce(state, user_id, &awarded),
        Err(e) => tracing::warn!(user_id, error = %e, "Badge check failed"),
    }
}

// ---------------------------------------------------------------------------
// GET /badges
// ---------------------------------------------------------------------------

/// The catalog. Inactive badges are listed only for admins who ask.
pub async fn list_badges(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> AppResult<impl IntoResponse> {
    let include_inactive = auth.is_admin() && params.include_inactive.unwrap_or(false);
    let badges = BadgeRepo::list(&state.pool, include_inactive).await?;
    Ok(Json(DataResponse { data: badges }))
}

// ---------------------------------------------------------------------------
// GET /badges/me
// ---------------------------------------------------------------------------

pub async fn list_my_badges(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let badges = BadgeRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: badges }))
}

// ---------------------------------------------------------------------------
// POST /badges/me/check
// ---------------------------------------------------------------------------

/// Re-evaluate the caller's progress and return the badges newly awarded.
pub async fn check_my_badges(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let awarded = BadgeRepo::award_earned(&state.pool, auth.user_id).await?;
    announce(&state, auth.user_id, &awarded);
    Ok(Json(DataResponse { data: awarded }))
}

// ---------------------------------------------------------------------------
// PUT /badges/me/{user_badge_id}/featured
// ---------------------------------------------------------------------------

/// Feature one held badge on the profile. At most one badge is featured.
pub async fn set_featured_badge(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_badge_id): Path<DbId>,
    Json(input): Json<SetFeaturedBadge>,
) -> AppResult<impl IntoResponse> {
    let badge = BadgeRepo::set_featured(&state.pool, auth.user_id, user_badge_id, input.is_featured)
        .await?
        .ok_or_else(|| CoreError::not_found("Badge", user_badge_id))?;
    Ok(Json(DataResponse { data: badge }))
}

// ---------------------------------------------------------------------------
// POST /admin/badges
// ---------------------------------------------------------------------------

pub async fn create_badge(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBadge>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_badge_name(&input.name)?;
    validate_criterion(&input.criterion)?;
    validate_threshold(input.threshold)?;

    let badge = BadgeRepo::create(&state.pool, &input).await?;
    tracing::info!(
        badge_id = badge.id,
        criterion = %badge.criterion,
        threshold = badge.threshold,
        admin_id = admin.user_id,
        "Badge created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: badge })))
}
