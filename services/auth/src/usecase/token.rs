use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};

use nhadat_auth_types::token::{AuthError, JwtClaims, TokenType, validate_token};

use crate::domain::types::{ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS, User};
use crate::error::AuthServiceError;

/// Access + refresh tokens handed to a client after authentication.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
    pub user: Option<User>,
}

/// Signs and verifies HS256 tokens with the shared secret.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Fails with [`AuthServiceError::Configuration`] when no secret is configured.
    pub fn new(secret: Option<&str>) -> Result<Self, AuthServiceError> {
        match secret {
            Some(s) if !s.is_empty() => Ok(Self {
                secret: s.to_owned(),
            }),
            _ => Err(AuthServiceError::Configuration(
                "JWT secret not configured".to_owned(),
            )),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Issue an access token (15 min) and a refresh token (30 days) for `user`.
    pub fn generate_token_pair(&self, user: &User) -> Result<TokenPair, AuthServiceError> {
        let sub = user.id.to_string();
        let access_token = self.sign(
            &sub,
            user.email.clone(),
            user.phone.clone(),
            TokenType::Access,
        )?;
        let refresh_token = self.sign(
            &sub,
            user.email.clone(),
            user.phone.clone(),
            TokenType::Refresh,
        )?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: ACCESS_TOKEN_TTL_SECS,
            user: Some(user.clone()),
        })
    }

    /// Verify signature and expiry of a token of either type.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, AuthServiceError> {
        validate_token(token, &self.secret).map_err(|e: AuthError| {
            tracing::debug!(error = %e, "token verification failed");
            AuthServiceError::InvalidToken
        })
    }

    /// Mint a fresh access token from a refresh token. The refresh token is not rotated.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthServiceError> {
        let claims = self.verify_token(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthServiceError::InvalidTokenType);
        }
        self.sign(&claims.sub, claims.email, claims.phone, TokenType::Access)
    }

    fn sign(
        &self,
        sub: &str,
        email: Option<String>,
        phone: Option<String>,
        token_type: TokenType,
    ) -> Result<String, AuthServiceError> {
        let iat = Utc::now().timestamp().max(0) as u64;
        let ttl = match token_type {
            TokenType::Access => ACCESS_TOKEN_TTL_SECS,
            TokenType::Refresh => REFRESH_TOKEN_TTL_SECS,
        };
        let claims = JwtClaims {
            sub: sub.to_owned(),
            email,
            phone,
            token_type,
            iat,
            exp: iat + ttl,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthServiceError::Internal(e.into()))
    }
}
