//! Handlers for warranty claims.
//!
//! Clients file one claim per completed booking. The booking's contractor
//! (or an admin) walks it through review; closing statuses record who
//! closed it and when.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fait_core::error::CoreError;
use fait_core::event_types::{WARRANTY_CLAIM_CREATED, WARRANTY_CLAIM_STATUS_CHANGED};
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_core::warranty::{self, check_booking_claimable, validate_description, validate_photo_urls};
use fait_db::models::warranty_claim::{
    CreateWarrantyClaim, UpdateWarrantyClaimStatus, WarrantyClaim, WarrantyClaimListParams,
};
use fait_db::repositories::{BookingRepo, WarrantyClaimRepo};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireClient;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_claim(state: &AppState, id: DbId) -> AppResult<WarrantyClaim> {
    Ok(WarrantyClaimRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("WarrantyClaim", id))?)
}

// ---------------------------------------------------------------------------
// POST /warranty-claims
// ---------------------------------------------------------------------------

pub async fn file_claim(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
    Json(input): Json<CreateWarrantyClaim>,
) -> AppResult<impl IntoResponse> {
    validate_description(&input.description)?;
    validate_photo_urls(&input.photo_urls)?;

    let booking = BookingRepo::find_by_id(&state.pool, input.booking_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Booking", input.booking_id))?;
    if booking.client_id != client.user_id {
        return Err(
            CoreError::Forbidden("Only the booking's client can file a claim".into()).into(),
        );
    }
    check_booking_claimable(&booking.status)?;

    let claim =
        WarrantyClaimRepo::create(&state.pool, client.user_id, booking.contractor_id, &input)
            .await?;

    tracing::info!(
        claim_id = claim.id,
        booking_id = booking.id,
        client_id = client.user_id,
        "Warranty claim filed",
    );
    state.event_bus.publish(
        PlatformEvent::new(WARRANTY_CLAIM_CREATED)
            .with_source("warranty_claim", claim.id)
            .with_actor(client.user_id)
            .for_users(&[claim.contractor_id], &claim),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: claim })))
}

// ---------------------------------------------------------------------------
// GET /warranty-claims
// ---------------------------------------------------------------------------

/// Admins see every claim; everyone else sees claims they are party to.
pub async fn list_claims(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WarrantyClaimListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        warranty::validate_status(s)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let user_filter = if auth.is_admin() {
        None
    } else {
        Some(auth.user_id)
    };

    let claims =
        WarrantyClaimRepo::list(&state.pool, user_filter, params.status.as_deref(), limit, offset)
            .await?;
    Ok(Json(DataResponse { data: claims }))
}

// ---------------------------------------------------------------------------
// GET /warranty-claims/{id}
// ---------------------------------------------------------------------------

pub async fn get_claim(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let claim = find_claim(&state, id).await?;
    if !auth.is_admin() && auth.user_id != claim.client_id && auth.user_id != claim.contractor_id
    {
        return Err(CoreError::Forbidden("You are not a party to this claim".into()).into());
    }
    Ok(Json(DataResponse { data: claim }))
}

// ---------------------------------------------------------------------------
// PUT /warranty-claims/{id}/status
// ---------------------------------------------------------------------------

pub async fn update_claim_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWarrantyClaimStatus>,
) -> AppResult<impl IntoResponse> {
    warranty::validate_status(&input.status)?;

    let current = find_claim(&state, id).await?;
    if !auth.is_admin() && auth.user_id != current.contractor_id {
        return Err(CoreError::Forbidden(
            "Only the contractor or an admin can update a claim".into(),
        )
        .into());
    }
    warranty::validate_transition(&current.status, &input.status)?;

    let closed_by = warranty::is_closing(&input.status).then_some(auth.user_id);
    let updated = WarrantyClaimRepo::transition_status(
        &state.pool,
        id,
        &current.status,
        &input.status,
        input.resolution_notes.as_deref(),
        closed_by,
    )
    .await?
    .ok_or_else(|| CoreError::Conflict("Claim status was changed by another request".into()))?;

    tracing::info!(
        claim_id = id,
        from = %current.status,
        to = %updated.status,
        user_id = auth.user_id,
        "Warranty claim status changed",
    );
    state.event_bus.publish(
        PlatformEvent::new(WARRANTY_CLAIM_STATUS_CHANGED)
            .with_source("warranty_claim", updated.id)
            .with_actor(auth.user_id)
            .for_users(&[updated.client_id, updated.contractor_id], &updated),
    );

    Ok(Json(DataResponse { data: updated }))
}
