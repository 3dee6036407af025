//! Handlers for contractor availability.
//!
//! Slots are either weekly (a day of week) or a date range, each with a
//! daily time window. A contractor's slots never overlap each other; the
//! repository enforces this under a lock on the contractor's profile.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use fait_core::availability::{is_available, Slot};
use fait_core::error::CoreError;
use fait_core::types::DbId;
use fait_db::models::availability::{
    AvailabilityCheck, AvailabilityCheckParams, AvailabilitySlot, AvailabilitySlotInput,
};
use fait_db::repositories::{AvailabilityRepo, SlotWrite};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireContractor;
use crate::response::DataResponse;
use crate::state::AppState;

/// Slots of a contractor as domain values.
async fn contractor_slots(state: &AppState, contractor_id: DbId) -> AppResult<Vec<Slot>> {
    let rows = AvailabilityRepo::list_for_contractor(&state.pool, contractor_id).await?;
    let slots = rows
        .iter()
        .map(AvailabilitySlot::to_slot)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(slots)
}

fn written(write: SlotWrite) -> AppResult<AvailabilitySlot> {
    match write {
        SlotWrite::Written(row) => Ok(row),
        SlotWrite::Overlaps => Err(CoreError::Conflict(
            "Availability slot overlaps an existing slot".into(),
        )
        .into()),
    }
}

async fn find_owned(
    state: &AppState,
    contractor_id: DbId,
    id: DbId,
) -> AppResult<AvailabilitySlot> {
    let slot = AvailabilityRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("AvailabilitySlot", id))?;
    if slot.contractor_id != contractor_id {
        return Err(CoreError::Forbidden("You can only modify your own availability".into()).into());
    }
    Ok(slot)
}

// ---------------------------------------------------------------------------
// GET /contractors/{id}/availability
// ---------------------------------------------------------------------------

pub async fn list_availability(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let slots = AvailabilityRepo::list_for_contractor(&state.pool, contractor_id).await?;
    Ok(Json(DataResponse { data: slots }))
}

// ---------------------------------------------------------------------------
// GET /contractors/{id}/availability/check
// ---------------------------------------------------------------------------

/// Whether some slot covers `start_time..end_time` on `date`.
pub async fn check_availability(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
    Query(params): Query<AvailabilityCheckParams>,
) -> AppResult<impl IntoResponse> {
    if params.end_time <= params.start_time {
        return Err(CoreError::Validation("End time must be after start time".into()).into());
    }
    let slots = contractor_slots(&state, contractor_id).await?;
    let available = is_available(&slots, params.date, params.start_time, params.end_time);

    Ok(Json(DataResponse {
        data: AvailabilityCheck {
            contractor_id,
            available,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /availability
// ---------------------------------------------------------------------------

pub async fn create_slot(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<AvailabilitySlotInput>,
) -> AppResult<impl IntoResponse> {
    let slot = input.to_slot()?;
    let row = written(AvailabilityRepo::create(&state.pool, contractor.user_id, &slot).await?)?;

    tracing::info!(
        slot_id = row.id,
        contractor_id = contractor.user_id,
        is_recurring = row.is_recurring,
        "Availability slot created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ---------------------------------------------------------------------------
// PUT /availability/{id}
// ---------------------------------------------------------------------------

pub async fn update_slot(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AvailabilitySlotInput>,
) -> AppResult<impl IntoResponse> {
    let slot = input.to_slot()?;
    find_owned(&state, contractor.user_id, id).await?;

    let write = AvailabilityRepo::update(&state.pool, contractor.user_id, id, &slot)
        .await?
        .ok_or_else(|| CoreError::not_found("AvailabilitySlot", id))?;
    let row = written(write)?;

    tracing::info!(slot_id = id, contractor_id = contractor.user_id, "Availability slot updated");
    Ok(Json(DataResponse { data: row }))
}

// ---------------------------------------------------------------------------
// DELETE /availability/{id}
// ---------------------------------------------------------------------------

pub async fn delete_slot(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_owned(&state, contractor.user_id, id).await?;
    AvailabilityRepo::delete(&state.pool, id).await?;

    tracing::info!(slot_id = id, contractor_id = contractor.user_id, "Availability slot deleted");
    Ok(StatusCode::NO_CONTENT)
}
