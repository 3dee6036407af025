//! Route definitions for reviews and linked external reviews.

use axum::routing::{delete, post, put};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(reviews::create_review))
}

/// Routes mounted at `/external-reviews`.
///
/// ```text
/// PUT    /       -> upsert_external_review
/// DELETE /{id}   -> delete_external_review
/// ```
pub fn external_router() -> Router<AppState> {
    Router::new()
        .route("/", put(reviews::upsert_external_review))
        .route("/{id}", delete(reviews::delete_external_review))
}
