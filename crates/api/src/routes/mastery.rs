//! Route definitions for mastery scores.

use axum::routing::get;
use axum::Router;

use crate::handlers::mastery;
use crate::state::AppState;

/// Routes mounted at `/mastery`. `/top` is registered ahead of the
/// `{profile_id}` capture.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/top", get(mastery::top_mastery))
        .route("/{profile_id}", get(mastery::get_mastery))
}

/// Routes mounted at `/gamification`.
pub fn gamification_router() -> Router<AppState> {
    Router::new().route("/me", get(mastery::get_my_gamification))
}
