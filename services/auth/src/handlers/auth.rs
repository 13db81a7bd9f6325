use std::sync::LazyLock;

use axum::{Json, extract::State, http::StatusCode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use nhadat_auth_types::identity::Identity;
use nhadat_domain::user::{UserStatus, UserType};

use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::auth::{
    LoginInput, LoginUseCase, RefreshTokenUseCase, RegisterInput, RegisterUseCase,
    ResendOtpUseCase, SendLoginOtpUseCase, VerifyOtpUseCase,
};
use crate::usecase::token::TokenPair;

static VN_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+84\d{9,10}$").expect("phone pattern"));

pub(crate) fn validate_vn_phone(phone: &str) -> Result<(), ValidationError> {
    if VN_PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("Phone must be in format +84XXXXXXXXX".into()))
    }
}

pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub status: UserStatus,
    pub phone_verified: bool,
    pub email_verified: bool,
    pub user_type: UserType,
    #[serde(serialize_with = "nhadat_core::serde::opt_to_rfc3339_ms")]
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "nhadat_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            phone: user.phone,
            email: user.email,
            full_name: user.full_name,
            status: user.status,
            phone_verified: user.phone_verified,
            email_verified: user.email_verified,
            user_type: user.user_type,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            user: pair.user.map(UserResponse::from),
        }
    }
}

// ── POST /auth/register ──────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_vn_phone"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: String,
    #[serde(default)]
    pub user_type: UserType,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), AuthServiceError> {
    body.validate()?;

    let usecase = RegisterUseCase {
        users: state.user_repo(),
        hasher: state.password_hasher(),
        otp: state.otp_engine(),
    };
    usecase
        .execute(RegisterInput {
            phone: body.phone,
            email: body.email,
            password: body.password,
            full_name: body.full_name,
            user_type: body.user_type,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        message("Registration successful. Please verify your account with the OTP sent."),
    ))
}

// ── POST /auth/verify-otp ────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, message = "identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "otp is required"))]
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<TokenPairResponse>, AuthServiceError> {
    body.validate()?;

    let usecase = VerifyOtpUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase.execute(&body.identifier, &body.otp).await?;
    Ok(Json(pair.into()))
}

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub otp: Option<String>,
    /// Accepted for client compatibility; token lifetimes are fixed.
    #[serde(default)]
    pub remember_me: bool,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        hasher: state.password_hasher(),
        otp: state.otp_engine(),
        tokens: state.tokens.clone(),
    };
    let pair = usecase
        .execute(LoginInput {
            identifier: body.identifier,
            phone: body.phone,
            email: body.email,
            password: body.password,
            otp: body.otp,
        })
        .await?;
    Ok(Json(pair.into()))
}

// ── POST /auth/send-otp, POST /auth/resend-otp ───────────────────────────────

#[derive(Deserialize, Validate)]
pub struct IdentifierRequest {
    #[validate(length(min = 1, message = "identifier is required"))]
    pub identifier: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<IdentifierRequest>,
) -> Result<Json<Value>, AuthServiceError> {
    body.validate()?;

    let usecase = SendLoginOtpUseCase {
        users: state.user_repo(),
        otp: state.otp_engine(),
    };
    usecase.execute(&body.identifier).await?;
    Ok(message("OTP sent successfully"))
}

pub async fn resend_otp(
    State(state): State<AppState>,
    Json(body): Json<IdentifierRequest>,
) -> Result<Json<Value>, AuthServiceError> {
    body.validate()?;

    let usecase = ResendOtpUseCase {
        otp: state.otp_engine(),
    };
    usecase.execute(&body.identifier).await?;
    Ok(message("OTP resent successfully"))
}

// ── POST /auth/refresh ───────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "refreshToken is required"))]
    pub refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AuthServiceError> {
    body.validate()?;

    let usecase = RefreshTokenUseCase {
        tokens: state.tokens.clone(),
    };
    let access_token = usecase.execute(&body.refresh_token)?;
    Ok(Json(RefreshResponse { access_token }))
}

// ── POST /auth/logout ────────────────────────────────────────────────────────

/// Tokens are stateless; the client discards them.
pub async fn logout(identity: Identity) -> Json<Value> {
    tracing::info!(user_id = %identity.user_id, "user logged out");
    message("Logout successful")
}
