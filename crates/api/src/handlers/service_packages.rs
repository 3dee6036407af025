//! Handlers for service packages (contractor listings).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::service_package::{validate_items, validate_price_cents, validate_title};
use fait_core::types::DbId;
use fait_db::models::service_package::{
    CreateServicePackage, ServicePackage, ServicePackageListParams, UpdateServicePackage,
};
use fait_db::repositories::{ReviewRepo, ServicePackageRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireContractor;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a package the caller may modify: its contractor, or an admin.
async fn find_owned(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<ServicePackage> {
    let package = ServicePackageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("ServicePackage", id))?;
    if package.contractor_id != auth.user_id && !auth.is_admin() {
        return Err(CoreError::Forbidden("You can only modify your own packages".into()).into());
    }
    Ok(package)
}

// ---------------------------------------------------------------------------
// POST /service-packages
// ---------------------------------------------------------------------------

pub async fn create_package(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<CreateServicePackage>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_title(&input.title)?;
    validate_price_cents(input.price_cents)?;
    validate_items("scope", &input.scope)?;
    validate_items("exclusions", &input.exclusions)?;

    let package = ServicePackageRepo::create(&state.pool, contractor.user_id, &input).await?;

    tracing::info!(
        package_id = package.id,
        contractor_id = contractor.user_id,
        "Service package created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: package })))
}

// ---------------------------------------------------------------------------
// GET /service-packages
// ---------------------------------------------------------------------------

/// Browse listings. Only active packages unless `active_only=false`.
pub async fn list_packages(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ServicePackageListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let packages = ServicePackageRepo::list(
        &state.pool,
        params.contractor_id,
        params.active_only.unwrap_or(true),
        limit,
        offset,
    )
    .await?;
    Ok(Json(DataResponse { data: packages }))
}

// ---------------------------------------------------------------------------
// GET /service-packages/{id}
// ---------------------------------------------------------------------------

pub async fn get_package(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let package = ServicePackageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("ServicePackage", id))?;
    Ok(Json(DataResponse { data: package }))
}

// ---------------------------------------------------------------------------
// PUT /service-packages/{id}
// ---------------------------------------------------------------------------

pub async fn update_package(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateServicePackage>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    if let Some(price) = input.price_cents {
        validate_price_cents(price)?;
    }
    if let Some(ref scope) = input.scope {
        validate_items("scope", scope)?;
    }
    if let Some(ref exclusions) = input.exclusions {
        validate_items("exclusions", exclusions)?;
    }

    find_owned(&state, &auth, id).await?;
    let package = ServicePackageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("ServicePackage", id))?;

    tracing::info!(package_id = id, user_id = auth.user_id, "Service package updated");
    Ok(Json(DataResponse { data: package }))
}

// ---------------------------------------------------------------------------
// DELETE /service-packages/{id}
// ---------------------------------------------------------------------------

/// Delete a listing. Packages with bookings are protected by a foreign key
/// and yield 400; deactivate them instead.
pub async fn delete_package(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_owned(&state, &auth, id).await?;
    if !ServicePackageRepo::delete(&state.pool, id).await? {
        return Err(CoreError::not_found("ServicePackage", id).into());
    }
    tracing::info!(package_id = id, user_id = auth.user_id, "Service package deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /service-packages/{id}/reviews
// ---------------------------------------------------------------------------

pub async fn list_package_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let reviews = ReviewRepo::list_for_package(&state.pool, id, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}
