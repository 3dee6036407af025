//! Handlers for profiles.
//!
//! A profile is keyed by the token subject. The first `PUT /profiles/me`
//! creates it with the token's role and credits the welcome bonus; later
//! calls update contact details. Role changes are admin-only.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::event_types::PROFILE_CREATED;
use fait_core::points::AWARD_WELCOME;
use fait_core::profile::{validate_contact, validate_full_name};
use fait_core::roles::validate_role;
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_db::models::points::PointsAward;
use fait_db::models::profile::{ProfileListParams, UpdateProfileRole, UpsertProfile};
use fait_db::repositories::ProfileRepo;
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::badges::award_earned_badges;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// GET /profiles/me
// ---------------------------------------------------------------------------

pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", auth.user_id))?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// PUT /profiles/me
// ---------------------------------------------------------------------------

/// Create or update the caller's profile.
///
/// Returns 201 when the profile was created, 200 when it was updated.
pub async fn upsert_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpsertProfile>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_full_name(&input.full_name)?;
    validate_contact(
        Some(&input.email),
        input.phone.as_deref(),
        input.state.as_deref(),
        input.zip_code.as_deref(),
    )?;

    if let Some(profile) = ProfileRepo::update(&state.pool, auth.user_id, &input).await? {
        tracing::info!(profile_id = profile.id, "Profile updated");
        return Ok((StatusCode::OK, Json(DataResponse { data: profile })));
    }

    validate_role(&auth.role)?;
    let profile = ProfileRepo::create_with_award(
        &state.pool,
        auth.user_id,
        &auth.role,
        &input,
        &PointsAward {
            points_amount: AWARD_WELCOME,
            description: "Welcome bonus",
        },
    )
    .await?;

    tracing::info!(profile_id = profile.id, role = %profile.role, "Profile created");
    state.event_bus.publish(
        PlatformEvent::new(PROFILE_CREATED)
            .with_source("profile", profile.id)
            .with_actor(auth.user_id),
    );
    award_earned_badges(&state, profile.id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

// ---------------------------------------------------------------------------
// GET /profiles/{id}
// ---------------------------------------------------------------------------

pub async fn get_profile(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", id))?;
    Ok(Json(DataResponse { data: profile }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /admin/profiles
pub async fn list_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ProfileListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref role) = params.role {
        validate_role(role)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let profiles = ProfileRepo::list(&state.pool, params.role.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: profiles }))
}

/// PUT /admin/profiles/{id}/role
pub async fn update_profile_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProfileRole>,
) -> AppResult<impl IntoResponse> {
    validate_role(&input.role)?;

    let profile = ProfileRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", id))?;

    tracing::info!(profile_id = id, role = %input.role, admin_id = admin.user_id, "Profile role changed");
    Ok(Json(DataResponse { data: profile }))
}

/// DELETE /admin/profiles/{id}
pub async fn delete_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ProfileRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Profile", id).into());
    }
    tracing::info!(profile_id = id, admin_id = admin.user_id, "Profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
