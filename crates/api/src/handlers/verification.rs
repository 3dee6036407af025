//! Handlers for contractor verification.
//!
//! Contractors submit license and insurance details and may start an
//! external background check. Admins review the queue, record the outcome
//! of the check and approve or reject the contractor.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::event_types::{
    BACKGROUND_CHECK_STARTED, VERIFICATION_DECIDED, VERIFICATION_SUBMITTED,
};
use fait_core::points::AWARD_VERIFICATION_APPROVED;
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_core::verification::{
    decide, validate_check_status, validate_check_transition, CHECK_PENDING,
};
use fait_db::models::points::PointsAward;
use fait_db::models::verification::{
    ContractorVerification, SubmitVerification, UpdateBackgroundCheck, VerificationDecision,
    VerificationListParams,
};
use fait_db::repositories::{ProfileRepo, VerificationRepo};
use fait_events::PlatformEvent;

use crate::background_check::{BackgroundCheckError, BackgroundCheckRequest};
use crate::error::AppResult;
use crate::handlers::badges::award_earned_badges;
use crate::middleware::rbac::{RequireAdmin, RequireContractor};
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_verification(
    state: &AppState,
    contractor_id: DbId,
) -> AppResult<ContractorVerification> {
    let verification = VerificationRepo::find_by_contractor(&state.pool, contractor_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ContractorVerification", contractor_id))?;
    Ok(verification)
}

// ---------------------------------------------------------------------------
// Contractor
// ---------------------------------------------------------------------------

/// PUT /verification/me: submit or resubmit details.
pub async fn submit_verification(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<SubmitVerification>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let verification = VerificationRepo::submit(&state.pool, contractor.user_id, &input).await?;

    tracing::info!(contractor_id = contractor.user_id, "Verification submitted");
    state.event_bus.publish(
        PlatformEvent::new(VERIFICATION_SUBMITTED)
            .with_source("contractor_verification", verification.id)
            .with_actor(contractor.user_id),
    );

    Ok(Json(DataResponse { data: verification }))
}

/// GET /verification/me
pub async fn get_my_verification(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let verification = find_verification(&state, contractor.user_id).await?;
    Ok(Json(DataResponse { data: verification }))
}

/// POST /verification/me/background-check: start the external check.
///
/// Allowed from `not_started`, and from `failed` as a retry.
pub async fn start_background_check(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let provider = state
        .background_check
        .clone()
        .ok_or(BackgroundCheckError::NotConfigured)?;

    let current = find_verification(&state, contractor.user_id).await?;
    validate_check_transition(&current.background_check_status, CHECK_PENDING)?;

    let profile = ProfileRepo::find_by_id(&state.pool, contractor.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", contractor.user_id))?;

    let response = provider
        .initiate(&BackgroundCheckRequest {
            contractor_id: profile.id,
            full_name: profile.full_name,
            email: profile.email,
        })
        .await?;

    let updated = VerificationRepo::transition_background_check(
        &state.pool,
        contractor.user_id,
        &current.background_check_status,
        CHECK_PENDING,
        response.candidate_id.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        CoreError::Conflict("Background check status was changed by another request".into())
    })?;

    tracing::info!(
        contractor_id = contractor.user_id,
        candidate_id = ?response.candidate_id,
        "Background check started",
    );
    state.event_bus.publish(
        PlatformEvent::new(BACKGROUND_CHECK_STARTED)
            .with_source("contractor_verification", updated.id)
            .with_actor(contractor.user_id),
    );

    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// GET /admin/verifications
pub async fn list_verifications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<VerificationListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.background_check_status {
        validate_check_status(s)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let records = VerificationRepo::list(
        &state.pool,
        params.is_verified,
        params.background_check_status.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /admin/verifications/{contractor_id}
pub async fn get_verification(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let verification = find_verification(&state, contractor_id).await?;
    Ok(Json(DataResponse { data: verification }))
}

/// POST /admin/verifications/{contractor_id}/decision
///
/// The first approval of a contractor credits the verification bonus.
pub async fn decide_verification(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
    Json(input): Json<VerificationDecision>,
) -> AppResult<impl IntoResponse> {
    let decision = decide(&input.decision, input.rejection_reason.as_deref())?;

    let recorded = VerificationRepo::record_decision(
        &state.pool,
        contractor_id,
        decision.is_verified,
        decision.rejection_reason.as_deref(),
        &PointsAward {
            points_amount: AWARD_VERIFICATION_APPROVED,
            description: "Verification approved",
        },
    )
    .await?
    .ok_or_else(|| CoreError::not_found("ContractorVerification", contractor_id))?;
    let updated = recorded.verification;

    tracing::info!(
        contractor_id,
        is_verified = decision.is_verified,
        bonus_awarded = recorded.bonus_awarded,
        admin_id = admin.user_id,
        "Verification decided",
    );
    state.event_bus.publish(
        PlatformEvent::new(VERIFICATION_DECIDED)
            .with_source("contractor_verification", updated.id)
            .with_actor(admin.user_id)
            .for_users(&[contractor_id], &updated),
    );
    if recorded.bonus_awarded {
        award_earned_badges(&state, contractor_id).await;
    }

    Ok(Json(DataResponse { data: updated }))
}

/// PUT /admin/verifications/{contractor_id}/background-check
///
/// Record the outcome reported by the background-check provider.
pub async fn update_background_check(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
    Json(input): Json<UpdateBackgroundCheck>,
) -> AppResult<impl IntoResponse> {
    validate_check_status(&input.status)?;

    let current = find_verification(&state, contractor_id).await?;
    validate_check_transition(&current.background_check_status, &input.status)?;

    let updated = VerificationRepo::transition_background_check(
        &state.pool,
        contractor_id,
        &current.background_check_status,
        &input.status,
        None,
    )
    .await?
    .ok_or_else(|| {
        CoreError::Conflict("Background check status was changed by another request".into())
    })?;

    tracing::info!(
        contractor_id,
        from = %current.background_check_status,
        to = %updated.background_check_status,
        admin_id = admin.user_id,
        "Background check status recorded",
    );
    Ok(Json(DataResponse { data: updated }))
}
