//! Admin view of the persisted domain event log.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_db::repositories::EventRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /admin/events -- newest first.
pub async fn list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let events = EventRepo::list_recent(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: events }))
}
