//! Handlers for booking conversations.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use validator::Validate;
use fait_core::event_types::MESSAGE_CREATED;
use fait_core::messaging::{recipient_for, validate_content};
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_db::models::message::{CreateMessage, UnreadCount};
use fait_db::repositories::MessageRepo;
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::bookings::find_for_party;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// GET /bookings/{id}/messages
// ---------------------------------------------------------------------------

/// Conversation of a booking, oldest first.
pub async fn list_messages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    find_for_party(&state, &auth, booking_id).await?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let messages = MessageRepo::list_for_booking(&state.pool, booking_id, limit, offset).await?;
    Ok(Json(DataResponse { data: messages }))
}

// ---------------------------------------------------------------------------
// POST /bookings/{id}/messages
// ---------------------------------------------------------------------------

/// Send a message to the other participant. Admins can read but not post.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_content(&input.content)?;

    let (booking, _) = find_for_party(&state, &auth, booking_id).await?;
    let recipient_id = recipient_for(auth.user_id, booking.client_id, booking.contractor_id)?;

    let message = MessageRepo::create(
        &state.pool,
        booking_id,
        auth.user_id,
        recipient_id,
        input.content.trim(),
    )
    .await?;

    tracing::info!(
        message_id = message.id,
        booking_id,
        sender_id = auth.user_id,
        "Message sent",
    );
    state.event_bus.publish(
        PlatformEvent::new(MESSAGE_CREATED)
            .with_source("message", message.id)
            .with_actor(auth.user_id)
            .for_users(&[recipient_id], &message),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

// ---------------------------------------------------------------------------
// POST /bookings/{id}/messages/read
// ---------------------------------------------------------------------------

/// Mark every message addressed to the caller in this booking as read.
pub async fn mark_messages_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(booking_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_for_party(&state, &auth, booking_id).await?;
    let updated = MessageRepo::mark_read(&state.pool, booking_id, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: MarkedRead { updated },
    }))
}

// ---------------------------------------------------------------------------
// GET /messages/unread-count
// ---------------------------------------------------------------------------

pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let unread = MessageRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread },
    }))
}
