#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use fait_api::auth::jwt::{generate_access_token, JwtConfig};
use fait_api::background_check::BackgroundCheckProvider;
use fait_api::config::ServerConfig;
use fait_api::routes;
use fait_api::state::AppState;
use fait_api::ws::WsManager;
use fait_core::types::DbId;

/// Build a test `ServerConfig` with safe defaults and no background-check
/// integration.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
        background_check: None,
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, None)
}

/// Same as [`build_test_app`] with an explicit background-check provider.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack production uses.
pub fn build_test_app_with(
    pool: PgPool,
    background_check: Option<Arc<dyn BackgroundCheckProvider>>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(fait_events::EventBus::default()),
        background_check,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Mint a bearer token for `user_id` with the given role claim.
pub fn token(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: Method, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::POST, uri, token, body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::PUT, uri, token, body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a profile through the API and return a token for it.
pub async fn create_profile(pool: &PgPool, user_id: DbId, role: &str) -> String {
    let token = token(user_id, role);
    let response = put_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/profiles/me",
        &token,
        serde_json::json!({
            "full_name": format!("User {user_id}"),
            "email": format!("user{user_id}@example.com"),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    token
}

/// Create an active package for the contractor and return its id.
pub async fn create_package(pool: &PgPool, contractor_token: &str, price_cents: i64) -> DbId {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/service-packages",
        contractor_token,
        serde_json::json!({
            "title": "Gutter cleaning",
            "description": "Full clean of all gutters",
            "price_cents": price_cents,
            "scope": ["Gutters", "Downspouts"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Book the package as the client and return the booking id.
pub async fn create_booking(pool: &PgPool, client_token: &str, package_id: DbId) -> DbId {
    let response = post_json_auth(
        build_test_app(pool.clone()),
        "/api/v1/bookings",
        client_token,
        serde_json::json!({
            "service_package_id": package_id,
            "scheduled_date": "2030-06-03",
            "scheduled_time": "09:00:00",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Move a booking to `status` as the given party.
pub async fn set_booking_status(
    pool: &PgPool,
    token: &str,
    booking_id: DbId,
    status: &str,
) -> Response {
    put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/bookings/{booking_id}/status"),
        token,
        serde_json::json!({ "status": status }),
    )
    .await
}

/// Create a client, a contractor and a completed booking between them.
///
/// Returns `(client_token, contractor_token, booking_id)`.
pub async fn completed_booking(pool: &PgPool, client_id: DbId, contractor_id: DbId) -> (String, String, DbId) {
    let client = create_profile(pool, client_id, "client").await;
    let contractor = create_profile(pool, contractor_id, "contractor").await;
    let package_id = create_package(pool, &contractor, 15_000).await;
    let booking_id = create_booking(pool, &client, package_id).await;

    let response = set_booking_status(pool, &contractor, booking_id, "confirmed").await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = set_booking_status(pool, &contractor, booking_id, "completed").await;
    assert_eq!(response.status(), StatusCode::OK);

    (client, contractor, booking_id)
}
