use axum::http::{HeaderName, HeaderValue, StatusCode, header::AUTHORIZATION};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use uuid::Uuid;

use nhadat_auth::infra::memory::InMemoryOtpStore;
use nhadat_auth::infra::otp_store::OtpBackend;
use nhadat_auth::router::build_router;
use nhadat_auth::state::AppState;
use nhadat_auth::usecase::otp::OtpMode;
use nhadat_testing::auth::MockAuth;

use crate::helpers::{TEST_JWT_SECRET, test_user, token_service};

// Routes exercised here fail or succeed before any database access.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        otp_store: OtpBackend::Memory(InMemoryOtpStore::new()),
        otp_mode: OtpMode::Mock,
        tokens: token_service(),
        bcrypt_cost: 4,
    };
    TestServer::new(build_router(state)).unwrap()
}

// ── health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn healthz_and_readyz_return_200() {
    let server = server();
    server.get("/healthz").await.assert_status_ok();
    server.get("/readyz").await.assert_status_ok();
}

#[tokio::test]
async fn responses_carry_request_id() {
    let res = server().get("/healthz").await;
    let id = res.header("x-request-id");
    assert!(Uuid::parse_str(id.to_str().unwrap()).is_ok());
}

// ── register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_with_malformed_phone_is_400() {
    let res = server()
        .post("/auth/register")
        .json(&json!({ "phone": "0901234567", "fullName": "Nguyen Van A" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn register_with_short_password_is_400() {
    let res = server()
        .post("/auth/register")
        .json(&json!({
            "email": "a@example.com",
            "password": "short",
            "fullName": "Nguyen Van A"
        }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
}

// ── login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_without_identifier_is_400() {
    let res = server()
        .post("/auth/login")
        .json(&json!({ "password": "password123" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["message"], "Either phone or email is required");
}

#[tokio::test]
async fn login_without_password_or_otp_is_400() {
    let res = server()
        .post("/auth/login")
        .json(&json!({ "identifier": "a@example.com" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["message"], "Either password or OTP is required");
}

// ── resend-otp ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn resend_otp_succeeds_then_rate_limits() {
    let server = server();

    let first = server
        .post("/auth/resend-otp")
        .json(&json!({ "identifier": "+84901234567" }))
        .await;
    first.assert_status_ok();
    let body: Value = first.json();
    assert_eq!(body["message"], "OTP resent successfully");

    let second = server
        .post("/auth/resend-otp")
        .json(&json!({ "identifier": "+84901234567" }))
        .await;
    second.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = second.json();
    assert_eq!(body["kind"], "OTP_RATE_LIMITED");
}

#[tokio::test]
async fn resend_otp_with_empty_identifier_is_400() {
    server()
        .post("/auth/resend-otp")
        .json(&json!({ "identifier": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ── refresh ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_returns_access_token_only() {
    let pair = token_service().generate_token_pair(&test_user()).unwrap();

    let res = server()
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": pair.refresh_token }))
        .await;

    res.assert_status_ok();
    let body: Value = res.json();
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(body.get("refreshToken").is_none());
}

#[tokio::test]
async fn refresh_with_access_token_is_401() {
    let pair = token_service().generate_token_pair(&test_user()).unwrap();

    let res = server()
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": pair.access_token }))
        .await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "INVALID_TOKEN_TYPE");
}

#[tokio::test]
async fn refresh_with_garbage_is_401() {
    let res = server()
        .post("/auth/refresh")
        .json(&json!({ "refreshToken": "garbage" }))
        .await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = res.json();
    assert_eq!(body["kind"], "INVALID_TOKEN");
}

// ── logout ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn logout_with_access_token_succeeds() {
    let auth = MockAuth::new(Uuid::new_v4(), TEST_JWT_SECRET);

    let res = server()
        .post("/auth/logout")
        .add_header(AUTHORIZATION, auth.bearer())
        .await;

    res.assert_status_ok();
    let body: Value = res.json();
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn logout_without_token_is_401() {
    server()
        .post("/auth/logout")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_with_refresh_token_is_401() {
    let auth = MockAuth::new(Uuid::new_v4(), TEST_JWT_SECRET);

    server()
        .post("/auth/logout")
        .add_header(AUTHORIZATION, auth.refresh_bearer())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_with_malformed_header_is_401() {
    server()
        .post("/auth/logout")
        .add_header(
            HeaderName::from_static("authorization"),
            HeaderValue::from_static("Token abc"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ── profile ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_routes_without_token_are_401() {
    let server = server();
    server
        .get("/users/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .patch("/users/me")
        .json(&json!({ "fullName": "Tran Thi B" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .post("/users/me/change-password")
        .json(&json!({ "currentPassword": "password123", "newPassword": "newpassword1" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn update_profile_with_malformed_phone_is_400() {
    let auth = MockAuth::new(Uuid::new_v4(), TEST_JWT_SECRET);

    let res = server()
        .patch("/users/me")
        .add_header(AUTHORIZATION, auth.bearer())
        .json(&json!({ "phone": "0901234567" }))
        .await;

    res.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["kind"], "VALIDATION");
}

#[tokio::test]
async fn change_password_with_short_new_password_is_400() {
    let auth = MockAuth::new(Uuid::new_v4(), TEST_JWT_SECRET);

    server()
        .post("/users/me/change-password")
        .add_header(AUTHORIZATION, auth.bearer())
        .json(&json!({ "currentPassword": "password123", "newPassword": "short" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}
