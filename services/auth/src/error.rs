use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Failures of the OTP challenge flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    #[error("OTP already sent. Please wait before requesting again.")]
    RateLimited,
    #[error("No OTP found. Please request a new one.")]
    NotFound,
    #[error("OTP expired. Please request a new one.")]
    Expired,
    #[error("Too many failed attempts. Please request a new OTP.")]
    AttemptsExhausted,
    #[error("Invalid OTP. {remaining} attempts remaining.")]
    InvalidCode { remaining: u32 },
}

impl OtpError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited => "OTP_RATE_LIMITED",
            Self::NotFound => "OTP_NOT_FOUND",
            Self::Expired => "OTP_EXPIRED",
            Self::AttemptsExhausted => "OTP_ATTEMPTS_EXHAUSTED",
            Self::InvalidCode { .. } => "INVALID_OTP",
        }
    }
}

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("User with this phone or email already exists")]
    UserAlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is not active")]
    AccountInactive,
    #[error("Password not set. Please use OTP login.")]
    PasswordNotSet,
    #[error("User not found")]
    UserNotFound,
    /// The authenticated account no longer exists.
    #[error("User not found")]
    AccountNotFound,
    #[error("Phone number already in use")]
    PhoneInUse,
    #[error("Email already in use")]
    EmailInUse,
    #[error("Current password is incorrect")]
    WrongCurrentPassword,
    #[error(transparent)]
    Otp(#[from] OtpError),
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid token type")]
    InvalidTokenType,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AuthServiceError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(e.to_string())
    }
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::AccountInactive => "ACCOUNT_INACTIVE",
            Self::PasswordNotSet => "PASSWORD_NOT_SET",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::PhoneInUse => "PHONE_IN_USE",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::WrongCurrentPassword => "WRONG_CURRENT_PASSWORD",
            Self::Otp(e) => e.kind(),
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidTokenType => "INVALID_TOKEN_TYPE",
            Self::Configuration(_) => "CONFIGURATION",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) | Self::PasswordNotSet | Self::WrongCurrentPassword => {
                StatusCode::BAD_REQUEST
            }
            Self::UserAlreadyExists | Self::PhoneInUse | Self::EmailInUse => StatusCode::CONFLICT,
            Self::AccountNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials
            | Self::AccountInactive
            | Self::UserNotFound
            | Self::InvalidToken
            | Self::InvalidTokenType => StatusCode::UNAUTHORIZED,
            Self::Otp(OtpError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            Self::Otp(_) => StatusCode::UNAUTHORIZED,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and TraceLayer already records them.
        match &self {
            Self::Internal(e) => tracing::error!(error = ?e, kind = "INTERNAL", "internal error"),
            Self::Configuration(msg) => {
                tracing::error!(error = %msg, kind = "CONFIGURATION", "configuration error")
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
