//! Route definitions for badges.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::badges;
use crate::state::AppState;

/// Routes mounted at `/badges`.
///
/// ```text
/// GET    /                              -> list_badges
/// GET    /me                            -> list_my_badges
/// POST   /me/check                      -> check_my_badges
/// PUT    /me/{user_badge_id}/featured   -> set_featured_badge
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(badges::list_badges))
        .route("/me", get(badges::list_my_badges))
        .route("/me/check", post(badges::check_my_badges))
        .route("/me/{user_badge_id}/featured", put(badges::set_featured_badge))
}
