//! Route definitions for profiles.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /me     -> get_my_profile
/// PUT    /me     -> upsert_my_profile
/// GET    /{id}   -> get_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(profiles::get_my_profile).put(profiles::upsert_my_profile),
        )
        .route("/{id}", get(profiles::get_profile))
}

/// Routes mounted at `/admin/profiles`.
///
/// ```text
/// GET    /            -> list_profiles
/// PUT    /{id}/role   -> update_profile_role
/// DELETE /{id}        -> delete_profile
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(profiles::list_profiles))
        .route("/{id}/role", put(profiles::update_profile_role))
        .route("/{id}", delete(profiles::delete_profile))
}
