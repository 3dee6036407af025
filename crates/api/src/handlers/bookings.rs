//! Handlers for bookings.
//!
//! Clients book active packages; the booking then moves through
//! pending -> confirmed -> completed, or is cancelled. Who may set which
//! status is decided by [`check_party_may_set`]. Completion credits the
//! client with points.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::booking::{
    self, check_party_may_set, validate_cancellation_reason, validate_notes, BookingParty,
    STATUS_CANCELLED, STATUS_COMPLETED,
};
use fait_core::error::CoreError;
use fait_core::event_types::{BOOKING_CREATED, BOOKING_STATUS_CHANGED};
use fait_core::points::AWARD_BOOKING_COMPLETED;
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_db::models::booking::{
    Booking, BookingListParams, CreateBooking, NewBooking, UpdateBookingStatus,
};
use fait_db::models::points::PointsAward;
use fait_db::repositories::{BookingRepo, ServicePackageRepo};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::badges::award_earned_badges;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireClient;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a booking and the caller's relation to it. Outsiders get 403.
pub(crate) async fn find_for_party(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<(Booking, BookingParty)> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Booking", id))?;
    let party = BookingParty::resolve(
        auth.user_id,
        auth.is_admin(),
        booking.client_id,
        booking.contractor_id,
    )
    .ok_or_else(|| CoreError::Forbidden("You are not a participant of this booking".into()))?;
    Ok((booking, party))
}

// ---------------------------------------------------------------------------
// POST /bookings
// ---------------------------------------------------------------------------

pub async fn create_booking(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
    Json(input): Json<CreateBooking>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref notes) = input.notes {
        validate_notes(notes)?;
    }

    let package = ServicePackageRepo::find_by_id(&state.pool, input.service_package_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ServicePackage", input.service_package_id))?;
    if !package.is_active {
        return Err(CoreError::Conflict("This service package is not available".into()).into());
    }

    let new_booking = NewBooking {
        client_id: client.user_id,
        contractor_id: package.contractor_id,
        service_package_id: package.id,
        scheduled_date: input.scheduled_date,
        scheduled_time: input.scheduled_time,
        total_amount_cents: package.price_cents,
        notes: input.notes,
    };
    let booking = BookingRepo::create(&state.pool, &new_booking).await?;

    tracing::info!(
        booking_id = booking.id,
        client_id = booking.client_id,
        contractor_id = booking.contractor_id,
        "Booking created",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOKING_CREATED)
            .with_source("booking", booking.id)
            .with_actor(client.user_id)
            .for_users(&[booking.contractor_id], &booking),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: booking })))
}

// ---------------------------------------------------------------------------
// GET /bookings
// ---------------------------------------------------------------------------

/// Bookings where the caller is client or contractor.
pub async fn list_bookings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref s) = params.status {
        booking::validate_status(s)?;
    }
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let bookings = BookingRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.status.as_deref(),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: bookings }))
}

// ---------------------------------------------------------------------------
// GET /bookings/{id}
// ---------------------------------------------------------------------------

pub async fn get_booking(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (booking, _) = find_for_party(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: booking }))
}

// ---------------------------------------------------------------------------
// PUT /bookings/{id}/status
// ---------------------------------------------------------------------------

pub async fn update_booking_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBookingStatus>,
) -> AppResult<impl IntoResponse> {
    booking::validate_status(&input.status)?;

    let (current, party) = find_for_party(&state, &auth, id).await?;
    booking::validate_transition(&current.status, &input.status)?;
    check_party_may_set(party, &input.status)?;

    let reason = if input.status == STATUS_CANCELLED {
        let reason = input.cancellation_reason.as_deref().unwrap_or_default();
        validate_cancellation_reason(reason)?;
        Some(reason.trim())
    } else {
        None
    };

    let transitioned = if input.status == STATUS_COMPLETED {
        BookingRepo::transition_status_with_award(
            &state.pool,
            id,
            &current.status,
            &input.status,
            reason,
            &PointsAward {
                points_amount: AWARD_BOOKING_COMPLETED,
                description: "Booking completed",
            },
        )
        .await?
    } else {
        BookingRepo::transition_status(&state.pool, id, &current.status, &input.status, reason)
            .await?
    };
    let updated = transitioned.ok_or_else(|| {
        CoreError::Conflict("Booking status was changed by another request".into())
    })?;

    tracing::info!(
        booking_id = id,
        from = %current.status,
        to = %updated.status,
        user_id = auth.user_id,
        "Booking status changed",
    );
    state.event_bus.publish(
        PlatformEvent::new(BOOKING_STATUS_CHANGED)
            .with_source("booking", updated.id)
            .with_actor(auth.user_id)
            .for_users(&[updated.client_id, updated.contractor_id], &updated),
    );
    if updated.status == STATUS_COMPLETED {
        award_earned_badges(&state, updated.client_id).await;
        award_earned_badges(&state, updated.contractor_id).await;
    }

    Ok(Json(DataResponse { data: updated }))
}
