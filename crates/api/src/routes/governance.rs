//! Route definitions for governance proposals.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::governance;
use crate::state::AppState;

/// Routes mounted at `/governance/proposals`.
///
/// ```text
/// GET    /             -> list_proposals
/// POST   /             -> create_proposal
/// GET    /{id}         -> get_proposal
/// POST   /{id}/vote    -> cast_vote
/// POST   /{id}/close   -> close_proposal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(governance::list_proposals).post(governance::create_proposal),
        )
        .route("/{id}", get(governance::get_proposal))
        .route("/{id}/vote", post(governance::cast_vote))
        .route("/{id}/close", post(governance::close_proposal))
}
