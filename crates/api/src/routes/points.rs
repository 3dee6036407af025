//! Route definitions for the points ledger.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

/// Routes mounted at `/points`.
///
/// ```text
/// GET    /me                -> get_my_points
/// GET    /me/transactions   -> list_my_transactions
/// POST   /spend             -> spend_points
/// GET    /leaderboard       -> leaderboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(points::get_my_points))
        .route("/me/transactions", get(points::list_my_transactions))
        .route("/spend", post(points::spend_points))
        .route("/leaderboard", get(points::leaderboard))
}
