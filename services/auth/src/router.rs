use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use nhadat_core::health::{healthz, readyz};
use nhadat_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::auth::{
    login, logout, refresh, register, resend_otp, send_otp, verify_otp,
};
use crate::handlers::profile::{change_password, get_profile, update_profile};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Registration
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        // Session
        .route("/auth/login", post(login))
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        // Profile
        .route("/users/me", get(get_profile).patch(update_profile))
        .route("/users/me/change-password", post(change_password))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
