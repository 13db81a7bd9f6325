use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`: readiness check.
///
/// Services connect to their stores before binding the listener, so a bound
/// service is ready.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
