use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use nhadat_auth_types::identity::Identity;

use crate::error::AuthServiceError;
use crate::handlers::auth::{UserResponse, message, validate_vn_phone};
use crate::state::AppState;
use crate::usecase::profile::{
    ChangePasswordUseCase, GetProfileUseCase, ProfileUpdate, UpdateProfileUseCase,
};

// ── GET /users/me ────────────────────────────────────────────────────────────

pub async fn get_profile(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, AuthServiceError> {
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/me ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 2, message = "Full name must be at least 2 characters"))]
    pub full_name: Option<String>,
    #[validate(custom(function = "validate_vn_phone"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

pub async fn update_profile(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AuthServiceError> {
    body.validate()?;

    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            ProfileUpdate {
                full_name: body.full_name,
                phone: body.phone,
                email: body.email,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── POST /users/me/change-password ───────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

pub async fn change_password(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AuthServiceError> {
    body.validate()?;

    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        hasher: state.password_hasher(),
    };
    usecase
        .execute(identity.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(message("Password changed successfully"))
}
