//! Route definitions for bookings and their message threads.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{bookings, messages};
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET    /                      -> list_bookings
/// POST   /                      -> create_booking
/// GET    /{id}                  -> get_booking
/// PUT    /{id}/status           -> update_booking_status
/// GET    /{id}/messages         -> list_messages
/// POST   /{id}/messages         -> send_message
/// POST   /{id}/messages/read    -> mark_messages_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}/status", put(bookings::update_booking_status))
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/{id}/messages/read", post(messages::mark_messages_read))
}

/// Routes mounted at `/messages`.
pub fn messages_router() -> Router<AppState> {
    Router::new().route("/unread-count", get(messages::unread_count))
}
