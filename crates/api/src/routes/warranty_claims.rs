//! Route definitions for warranty claims.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::warranty_claims;
use crate::state::AppState;

/// Routes mounted at `/warranty-claims`.
///
/// ```text
/// GET    /              -> list_claims
/// POST   /              -> file_claim
/// GET    /{id}          -> get_claim
/// PUT    /{id}/status   -> update_claim_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(warranty_claims::list_claims).post(warranty_claims::file_claim),
        )
        .route("/{id}", get(warranty_claims::get_claim))
        .route("/{id}/status", put(warranty_claims::update_claim_status))
}
