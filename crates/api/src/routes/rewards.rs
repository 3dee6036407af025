//! Route definitions for the rewards catalog.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::rewards;
use crate::state::AppState;

/// Routes mounted at `/rewards`. `/me` is registered ahead of the `{id}`
/// capture.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rewards::list_rewards))
        .route("/me", get(rewards::list_my_rewards))
        .route("/{id}", get(rewards::get_reward))
        .route("/{id}/redeem", post(rewards::redeem_reward))
}
