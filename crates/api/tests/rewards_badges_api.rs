//! HTTP-level tests for badges and the rewards catalog.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, completed_booking, create_profile, get_auth, post_json_auth, put_json_auth, token,
};
use sqlx::PgPool;

async fn award(pool: &PgPool, user_id: i64, amount: i32) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/points/award",
        &token(1, "admin"),
        serde_json::json!({
            "user_id": user_id,
            "points_amount": amount,
            "description": "Community event",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn badge_names(pool: &PgPool, token: &str) -> Vec<String> {
    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/badges/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mut names: Vec<String> = body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

/// Id of the seeded reward with this name.
async fn reward_id(pool: &PgPool, token: &str, name: &str) -> i64 {
    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/rewards", token).await;
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == name)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}

async fn redeem(pool: &PgPool, token: &str, reward_id: i64) -> axum::response::Response {
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/rewards/{reward_id}/redeem"),
        token,
        serde_json::json!({}),
    )
    .await
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn welcome_bonus_earns_first_steps(pool: PgPool) {
    let client = create_profile(&pool, 100, "client").await;
    assert_eq!(badge_names(&pool, &client).await, vec!["First Steps"]);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/gamification/me",
        &client,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["badges"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["badges"][0]["name"], "First Steps");

    // Nothing new to award on a second check.
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/badges/me/check",
        &client,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_and_review_award_badges(pool: PgPool) {
    let (client, contractor, booking_id) = completed_booking(&pool, 101, 102).await;
    assert_eq!(badge_names(&pool, &client).await, vec!["First Job", "First Steps"]);
    assert_eq!(badge_names(&pool, &contractor).await, vec!["First Job", "First Steps"]);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/reviews",
        &client,
        serde_json::json!({ "booking_id": booking_id, "rating": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        badge_names(&pool, &client).await,
        vec!["Critic", "First Job", "First Steps"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn featuring_a_badge_is_exclusive(pool: PgPool) {
    let client = create_profile(&pool, 103, "client").await;
    award(&pool, 103, 900).await;
    assert_eq!(badge_names(&pool, &client).await, vec!["First Steps", "Point Collector"]);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/badges/me", &client).await;
    let held: Vec<i64> = body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();

    for id in &held {
        let response = put_json_auth(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/badges/me/{id}/featured"),
            &client,
            serde_json::json!({ "is_featured": true }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/badges/me", &client).await;
    let json = body_json(response).await;
    let featured: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|b| b["is_featured"] == true)
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(featured, vec![held[held.len() - 1]]);

    // Another user cannot feature badges they do not hold.
    let other = create_profile(&pool, 104, "client").await;
    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/badges/me/{}/featured", held[0]),
        &other,
        serde_json::json!({ "is_featured": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admins_add_badges(pool: PgPool) {
    let client = create_profile(&pool, 105, "client").await;
    let body = serde_json::json!({
        "name": "Night Owl",
        "criterion": "reviews_written",
        "threshold": 5,
    });

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/badges",
        &client,
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/badges",
        &token(1, "admin"),
        serde_json::json!({ "name": "Lurker", "criterion": "logins", "threshold": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/badges",
        &token(1, "admin"),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get_auth(common::build_test_app(pool), "/api/v1/badges", &client).await;
    let json = body_json(response).await;
    assert!(json["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|b| b["name"] == "Night Owl"));
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn redeeming_spends_points(pool: PgPool) {
    let client = create_profile(&pool, 106, "client").await;
    let support = reward_id(&pool, &client, "Priority Support").await;

    let response = redeem(&pool, &client, support).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_POINTS");

    award(&pool, 106, 200).await;
    let response = redeem(&pool, &client, support).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["points_spent"], 250);

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/points/me", &client).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["spent"], 250);
    assert_eq!(json["data"]["balance"], 50);

    let response = get_auth(common::build_test_app(pool), "/api/v1/rewards/me", &client).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["reward_name"], "Priority Support");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_redemptions_cannot_overdraw(pool: PgPool) {
    let client = create_profile(&pool, 107, "client").await;
    award(&pool, 107, 200).await;
    let support = reward_id(&pool, &client, "Priority Support").await;

    let (a, b) = tokio::join!(redeem(&pool, &client, support), redeem(&pool, &client, support));
    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::FORBIDDEN]);

    let response = get_auth(common::build_test_app(pool), "/api/v1/points/me", &client).await;
    assert_eq!(body_json(response).await["data"]["balance"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_rewards_are_hidden_and_unredeemable(pool: PgPool) {
    let client = create_profile(&pool, 108, "client").await;
    let admin = token(1, "admin");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/rewards",
        &admin,
        serde_json::json!({ "name": "Sticker", "points_cost": 10, "is_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sticker = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get_auth(common::build_test_app(pool.clone()), "/api/v1/rewards", &client).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/rewards?include_inactive=true",
        &admin,
    )
    .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 4);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/rewards/{sticker}"),
        &client,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = redeem(&pool, &client, sticker).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/admin/rewards/{sticker}"),
        &admin,
        serde_json::json!({ "is_active": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = redeem(&pool, &client, sticker).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reward_costs_must_be_positive(pool: PgPool) {
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/admin/rewards",
        &token(1, "admin"),
        serde_json::json!({ "name": "Free lunch", "points_cost": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
