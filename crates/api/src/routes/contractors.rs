//! Route definitions for contractor-scoped read endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::{availability, reviews};
use crate::state::AppState;

/// Routes mounted at `/contractors`.
///
/// ```text
/// GET    /{id}/reviews              -> list_contractor_reviews
/// GET    /{id}/rating               -> get_rating_summary
/// GET    /{id}/external-reviews     -> list_external_reviews
/// GET    /{id}/availability         -> list_availability
/// GET    /{id}/availability/check   -> check_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/reviews", get(reviews::list_contractor_reviews))
        .route("/{id}/rating", get(reviews::get_rating_summary))
        .route("/{id}/external-reviews", get(reviews::list_external_reviews))
        .route("/{id}/availability", get(availability::list_availability))
        .route(
            "/{id}/availability/check",
            get(availability::check_availability),
        )
}
