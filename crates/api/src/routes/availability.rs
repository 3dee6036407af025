//! Route definitions for the caller's own availability slots.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::availability;
use crate::state::AppState;

/// Routes mounted at `/availability`.
///
/// ```text
/// POST   /       -> create_slot
/// PUT    /{id}   -> update_slot
/// DELETE /{id}   -> delete_slot
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(availability::create_slot))
        .route(
            "/{id}",
            put(availability::update_slot).delete(availability::delete_slot),
        )
}
