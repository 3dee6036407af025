//! Handlers for platform reviews and linked external review listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
use fait_core::error::CoreError;
use fait_core::event_types::REVIEW_CREATED;
use fait_core::points::AWARD_REVIEW_SUBMITTED;
use fait_core::review::{
    check_can_review, validate_comment, validate_external_rating, validate_platform,
    validate_rating,
};
use fait_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use fait_core::types::DbId;
use fait_db::models::points::PointsAward;
use fait_db::models::review::{CreateReview, NewReview, UpsertExternalReview};
use fait_db::repositories::{BookingRepo, ExternalReviewRepo, ReviewRepo};
use fait_events::PlatformEvent;

use crate::error::AppResult;
use crate::handlers::badges::award_earned_badges;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireClient, RequireContractor};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /reviews
// ---------------------------------------------------------------------------

/// Review a completed booking. One review per booking (409 on repeat).
pub async fn create_review(
    RequireClient(client): RequireClient,
    State(state): State<AppState>,
    Json(input): Json<CreateReview>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_rating(input.rating)?;
    if let Some(ref comment) = input.comment {
        validate_comment(comment)?;
    }

    let booking = BookingRepo::find_by_id(&state.pool, input.booking_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Booking", input.booking_id))?;
    check_can_review(&booking.status, booking.client_id, client.user_id)?;

    let review = ReviewRepo::create_with_award(
        &state.pool,
        &NewReview {
            booking_id: booking.id,
            client_id: booking.client_id,
            contractor_id: booking.contractor_id,
            service_package_id: booking.service_package_id,
            rating: input.rating,
            comment: input.comment,
        },
        &PointsAward {
            points_amount: AWARD_REVIEW_SUBMITTED,
            description: "Review submitted",
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        booking_id = booking.id,
        rating = review.rating,
        "Review submitted",
    );
    state.event_bus.publish(
        PlatformEvent::new(REVIEW_CREATED)
            .with_source("review", review.id)
            .with_actor(client.user_id)
            .for_users(&[review.contractor_id], &review),
    );
    award_earned_badges(&state, client.user_id).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

// ---------------------------------------------------------------------------
// GET /contractors/{id}/reviews
// ---------------------------------------------------------------------------

pub async fn list_contractor_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let reviews = ReviewRepo::list_for_contractor(&state.pool, contractor_id, limit, offset).await?;
    Ok(Json(DataResponse { data: reviews }))
}

// ---------------------------------------------------------------------------
// GET /contractors/{id}/rating
// ---------------------------------------------------------------------------

pub async fn get_rating_summary(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = ReviewRepo::rating_summary(&state.pool, contractor_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// External reviews
// ---------------------------------------------------------------------------

/// GET /contractors/{id}/external-reviews
pub async fn list_external_reviews(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(contractor_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let listings = ExternalReviewRepo::list_for_contractor(&state.pool, contractor_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// PUT /external-reviews: link or refresh the caller's listing on a platform.
pub async fn upsert_external_review(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Json(input): Json<UpsertExternalReview>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_platform(&input.platform)?;
    if let Some(rating) = input.rating {
        validate_external_rating(rating)?;
    }

    let listing = ExternalReviewRepo::upsert(&state.pool, contractor.user_id, &input).await?;

    tracing::info!(
        contractor_id = contractor.user_id,
        platform = %listing.platform,
        "External review listing saved",
    );
    Ok(Json(DataResponse { data: listing }))
}

/// DELETE /external-reviews/{id}
pub async fn delete_external_review(
    RequireContractor(contractor): RequireContractor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ExternalReviewRepo::delete(&state.pool, id, contractor.user_id).await? {
        return Err(CoreError::not_found("ExternalReview", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
