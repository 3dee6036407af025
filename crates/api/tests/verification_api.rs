//! HTTP-level tests for contractor verification and the background-check
//! integration.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, create_profile, get_auth, post_json_auth, put_json_auth, token};
use fait_api::background_check::{
    BackgroundCheckError, BackgroundCheckProvider, BackgroundCheckRequest, BackgroundCheckResponse,
};
use sqlx::PgPool;

/// Provider that accepts every request and counts calls.
#[derive(Default)]
struct FakeProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl BackgroundCheckProvider for FakeProvider {
    async fn initiate(
        &self,
        request: &BackgroundCheckRequest,
    ) -> Result<BackgroundCheckResponse, BackgroundCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(BackgroundCheckResponse {
            success: true,
            candidate_id: Some(format!("cand-{}", request.contractor_id)),
            message: None,
        })
    }
}

async fn submit(pool: &PgPool, contractor: &str) {
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/verification/me",
        contractor,
        serde_json::json!({
            "license_number": "C-10-998877",
            "license_type": "General Contractor",
            "license_expiry": "2031-01-31",
            "insurance_provider": "Acme Mutual",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_starts_unverified(pool: PgPool) {
    let contractor = create_profile(&pool, 90, "contractor").await;
    submit(&pool, &contractor).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/verification/me",
        &contractor,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_verified"], false);
    assert_eq!(json["data"]["background_check_status"], "not_started");
    assert_eq!(json["data"]["license_number"], "C-10-998877");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clients_cannot_submit_verification(pool: PgPool) {
    let client = create_profile(&pool, 91, "client").await;

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/verification/me",
        &client,
        serde_json::json!({ "license_number": "X" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn background_check_unconfigured_is_503(pool: PgPool) {
    let contractor = create_profile(&pool, 92, "contractor").await;
    submit(&pool, &contractor).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/verification/me/background-check",
        &contractor,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn background_check_goes_pending_once(pool: PgPool) {
    let contractor = create_profile(&pool, 93, "contractor").await;
    submit(&pool, &contractor).await;

    let provider = Arc::new(FakeProvider::default());
    let uri = "/api/v1/verification/me/background-check";

    let response = post_json_auth(
        common::build_test_app_with(pool.clone(), Some(provider.clone())),
        uri,
        &contractor,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["background_check_status"], "pending");
    assert_eq!(json["data"]["background_check_candidate_id"], "cand-93");

    // Already pending: rejected before the provider is called again.
    let response = post_json_auth(
        common::build_test_app_with(pool, Some(provider.clone())),
        uri,
        &contractor,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_records_check_result(pool: PgPool) {
    let contractor = create_profile(&pool, 94, "contractor").await;
    submit(&pool, &contractor).await;
    let admin = token(1, "admin");
    let uri = "/api/v1/admin/verifications/94/background-check";

    // Cannot jump straight to passed.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        uri,
        &admin,
        serde_json::json!({ "status": "passed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    for status in ["pending", "passed"] {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            uri,
            &admin,
            serde_json::json!({ "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/verifications?background_check_status=passed",
        &admin,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["contractor_id"], 94);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approval_awards_bonus_only_once(pool: PgPool) {
    let contractor = create_profile(&pool, 95, "contractor").await;
    submit(&pool, &contractor).await;
    let admin = token(1, "admin");
    let uri = "/api/v1/admin/verifications/95/decision";

    for _ in 0..2 {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            uri,
            &admin,
            serde_json::json!({ "decision": "approve" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["is_verified"], true);
        assert_eq!(json["data"]["admin_verified"], true);
    }

    let response = get_auth(common::build_test_app(pool), "/api/v1/points/me", &contractor).await;
    // Welcome bonus plus a single verification bonus.
    assert_eq!(body_json(response).await["data"]["balance"], 300);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_requires_reason(pool: PgPool) {
    let contractor = create_profile(&pool, 96, "contractor").await;
    submit(&pool, &contractor).await;
    let admin = token(1, "admin");
    let uri = "/api/v1/admin/verifications/96/decision";

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        uri,
        &admin,
        serde_json::json!({ "decision": "reject" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool),
        uri,
        &admin,
        serde_json::json!({ "decision": "reject", "rejection_reason": "License expired" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_verified"], false);
    assert_eq!(json["data"]["rejection_reason"], "License expired");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn decision_for_unknown_contractor_is_404(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/verifications/999999/decision",
        &token(1, "admin"),
        serde_json::json!({ "decision": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_approvals_award_bonus_once(pool: PgPool) {
    let contractor = create_profile(&pool, 97, "contractor").await;
    submit(&pool, &contractor).await;
    let admin = token(1, "admin");
    let uri = "/api/v1/admin/verifications/97/decision";
    let approve = || {
        post_json_auth(
            common::build_test_app(pool.clone()),
            uri,
            &admin,
            serde_json::json!({ "decision": "approve" }),
        )
    };

    let (a, b, c) = tokio::join!(approve(), approve(), approve());
    for response in [a, b, c] {
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(common::build_test_app(pool), "/api/v1/points/me", &contractor).await;
    assert_eq!(body_json(response).await["data"]["balance"], 300);
}
