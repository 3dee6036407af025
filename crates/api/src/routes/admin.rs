//! Admin-only routes that do not belong to a single resource router.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{badges, events, mastery, points, rewards};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /points/award              -> award_points
/// PUT    /mastery/{profile_id}      -> update_mastery
/// POST   /badges                    -> create_badge
/// POST   /rewards                   -> create_reward
/// PUT    /rewards/{id}              -> update_reward
/// GET    /events                    -> list_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/points/award", post(points::award_points))
        .route("/mastery/{profile_id}", put(mastery::update_mastery))
        .route("/badges", post(badges::create_badge))
        .route("/rewards", post(rewards::create_reward))
        .route("/rewards/{id}", put(rewards::update_reward))
        .route("/events", get(events::list_events))
}
