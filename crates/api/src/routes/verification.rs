//! Route definitions for contractor verification.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::verification;
use crate::state::AppState;

/// Routes mounted at `/verification`.
///
/// ```text
/// GET    /me                    -> get_my_verification
/// PUT    /me                    -> submit_verification
/// POST   /me/background-check   -> start_background_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(verification::get_my_verification).put(verification::submit_verification),
        )
        .route(
            "/me/background-check",
            post(verification::start_background_check),
        )
}

/// Routes mounted at `/admin/verifications`.
///
/// ```text
/// GET    /                                   -> list_verifications
/// GET    /{contractor_id}                    -> get_verification
/// POST   /{contractor_id}/decision           -> decide_verification
/// PUT    /{contractor_id}/background-check   -> update_background_check
/// ```
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(verification::list_verifications))
        .route("/{contractor_id}", get(verification::get_verification))
        .route(
            "/{contractor_id}/decision",
            post(verification::decide_verification),
        )
        .route(
            "/{contractor_id}/background-check",
            put(verification::update_background_check),
        )
}
