use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use potluck_api::router::build_router;
use potluck_api::state::AppState;
use potluck_core::identity::USER_ID_HEADER;
use potluck_testing::fixture::PNG_1X1_DATA_URL;
use potluck_testing::identity::TestIdentity;

/// Routes under test here reject or answer before touching the database,
/// so a disconnected handle is enough.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::default(),
        media_root: std::env::temp_dir().join("potluck-router-test"),
        public_host: "potluck.test".to_owned(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn with_identity(mut request: TestRequest, identity: &TestIdentity) -> TestRequest {
    for (name, value) in identity.headers().iter() {
        request = request.add_header(name.clone(), value.clone());
    }
    request
}

// ── Probes and middleware ────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_liveness_probe() {
    let server = server();
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn should_stamp_request_id_on_responses() {
    let server = server();
    let response = server.get("/healthz").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn should_return_404_for_unknown_path() {
    let server = server();
    assert_eq!(
        server.get("/api/nope").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

// ── Gateway identity enforcement ─────────────────────────────────────────────

#[tokio::test]
async fn should_reject_identity_routes_without_gateway_header() {
    let server = server();
    assert_eq!(
        server.get("/api/users/me").await.status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        server
            .get("/api/recipes/download_shopping_cart")
            .await
            .status_code(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        server.delete("/api/recipes/7").await.status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn should_reject_garbage_identity_header_on_anonymous_route() {
    let server = server();
    let response = server
        .get("/api/recipes")
        .add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ── Request parsing and validation ───────────────────────────────────────────

#[tokio::test]
async fn should_reject_non_numeric_recipe_id_in_path() {
    let server = server();
    let response = server.get("/api/recipes/not-a-number").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_invalid_registration_email() {
    let server = server();
    let response = server
        .post("/api/users")
        .json(&serde_json::json!({
            "email": "not-an-email",
            "username": "alice",
            "first_name": "Alice",
            "last_name": "Cook",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["message"], "invalid email address");
}

#[tokio::test]
async fn should_reject_recipe_with_zero_cooking_time() {
    let server = server();
    let identity = TestIdentity::new(Uuid::new_v4());
    let response = with_identity(server.post("/api/recipes"), &identity)
        .json(&serde_json::json!({
            "name": "Borscht",
            "text": "Simmer.",
            "image": PNG_1X1_DATA_URL,
            "cooking_time": 0,
            "ingredients": [{"id": 1, "amount": 5}],
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "VALIDATION");
    assert_eq!(body["message"], "cooking_time must be at least 1");
}

#[tokio::test]
async fn should_require_avatar_payload_on_put() {
    let server = server();
    let identity = TestIdentity::new(Uuid::new_v4());
    let response = with_identity(
        server.put(&format!("/api/users/{}/avatar", identity.user_id)),
        &identity,
    )
    .json(&serde_json::json!({ "avatar": "" }))
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "avatar is required");
}

#[tokio::test]
async fn should_reject_self_subscription() {
    let server = server();
    let identity = TestIdentity::new(Uuid::new_v4());
    let response = with_identity(
        server.post(&format!("/api/users/{}/subscribe", identity.user_id)),
        &identity,
    )
    .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "SELF_SUBSCRIPTION");
}
