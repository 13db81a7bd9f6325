use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use nhadat_domain::user::{UserStatus, UserType};

use crate::domain::repository::{OtpStore, PasswordHasher, UserRepository};
use crate::domain::types::{Channel, User};
use crate::error::AuthServiceError;
use crate::usecase::otp::OtpEngine;
use crate::usecase::token::{TokenPair, TokenService};

/// Pick the login identifier: `identifier`, then `phone`, then `email`.
/// Empty strings count as absent.
pub fn resolve_identifier(
    identifier: Option<&str>,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<String, AuthServiceError> {
    [identifier, phone, email]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AuthServiceError::Validation("Either phone or email is required".to_owned()))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: String,
    pub user_type: UserType,
}

pub struct RegisterUseCase<U: UserRepository, H: PasswordHasher, S: OtpStore> {
    pub users: U,
    pub hasher: H,
    pub otp: OtpEngine<S>,
}

impl<U: UserRepository, H: PasswordHasher, S: OtpStore> RegisterUseCase<U, H, S> {
    /// Create an unverified account and send an OTP to its phone (or e-mail).
    pub async fn execute(&self, input: RegisterInput) -> Result<Uuid, AuthServiceError> {
        let phone = non_empty(input.phone);
        let email = non_empty(input.email);
        let identifier = resolve_identifier(None, phone.as_deref(), email.as_deref())?;

        if self
            .users
            .exists_by_phone_or_email(phone.as_deref(), email.as_deref())
            .await?
        {
            return Err(AuthServiceError::UserAlreadyExists);
        }

        let password_hash = match input.password.as_deref() {
            Some(plain) if !plain.is_empty() => Some(self.hasher.hash(plain).await?),
            _ => None,
        };

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            phone,
            email,
            password_hash,
            full_name: Some(input.full_name),
            status: UserStatus::Active,
            phone_verified: false,
            email_verified: false,
            user_type: input.user_type,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        info!(user_id = %user.id, user_type = %user.user_type, "user registered");

        self.otp.send(&identifier).await?;
        Ok(user.id)
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpUseCase<U: UserRepository, S: OtpStore> {
    pub users: U,
    pub otp: OtpEngine<S>,
    pub tokens: TokenService,
}

impl<U: UserRepository, S: OtpStore> VerifyOtpUseCase<U, S> {
    /// Consume the OTP, mark the matching channel verified and issue tokens.
    pub async fn execute(&self, identifier: &str, code: &str) -> Result<TokenPair, AuthServiceError> {
        self.otp.verify(identifier, code).await?;

        let mut user = self
            .users
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;

        let channel = user.channel_for(identifier);
        self.users.mark_verified(user.id, channel).await?;
        match channel {
            Channel::Phone => user.phone_verified = true,
            Channel::Email => user.email_verified = true,
        }
        info!(user_id = %user.id, ?channel, "contact verified");

        self.tokens.generate_token_pair(&user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub identifier: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub otp: Option<String>,
}

pub struct LoginUseCase<U: UserRepository, H: PasswordHasher, S: OtpStore> {
    pub users: U,
    pub hasher: H,
    pub otp: OtpEngine<S>,
    pub tokens: TokenService,
}

impl<U: UserRepository, H: PasswordHasher, S: OtpStore> LoginUseCase<U, H, S> {
    /// Password login wins when both a password and an OTP are supplied.
    pub async fn execute(&self, input: LoginInput) -> Result<TokenPair, AuthServiceError> {
        let identifier = resolve_identifier(
            input.identifier.as_deref(),
            input.phone.as_deref(),
            input.email.as_deref(),
        )?;
        let password = non_empty(input.password);
        let otp = non_empty(input.otp);
        if password.is_none() && otp.is_none() {
            return Err(AuthServiceError::Validation(
                "Either password or OTP is required".to_owned(),
            ));
        }

        let user = self
            .users
            .find_by_identifier(&identifier)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !user.is_active() {
            return Err(AuthServiceError::AccountInactive);
        }

        if let Some(password) = password {
            let hash = user
                .password_hash
                .as_deref()
                .ok_or(AuthServiceError::PasswordNotSet)?;
            if !self.hasher.verify(&password, hash).await? {
                return Err(AuthServiceError::InvalidCredentials);
            }
        } else if let Some(code) = otp {
            self.otp.verify(&identifier, &code).await?;
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await?;
        info!(user_id = %user.id, "user logged in");

        let user = User {
            last_login_at: Some(now),
            ..user
        };
        self.tokens.generate_token_pair(&user)
    }
}

// ── SendLoginOtp ─────────────────────────────────────────────────────────────

pub struct SendLoginOtpUseCase<U: UserRepository, S: OtpStore> {
    pub users: U,
    pub otp: OtpEngine<S>,
}

impl<U: UserRepository, S: OtpStore> SendLoginOtpUseCase<U, S> {
    pub async fn execute(&self, identifier: &str) -> Result<(), AuthServiceError> {
        self.users
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthServiceError::UserNotFound)?;
        self.otp.send(identifier).await
    }
}

// ── ResendOtp ────────────────────────────────────────────────────────────────

/// Re-issue an OTP. Unlike [`SendLoginOtpUseCase`] this does not check that the
/// identifier belongs to an account.
pub struct ResendOtpUseCase<S: OtpStore> {
    pub otp: OtpEngine<S>,
}

impl<S: OtpStore> ResendOtpUseCase<S> {
    pub async fn execute(&self, identifier: &str) -> Result<(), AuthServiceError> {
        self.otp.send(identifier).await
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

pub struct RefreshTokenUseCase {
    pub tokens: TokenService,
}

impl RefreshTokenUseCase {
    /// Returns a new access token only.
    pub fn execute(&self, refresh_token: &str) -> Result<String, AuthServiceError> {
        self.tokens.refresh_access_token(refresh_token)
    }
}
