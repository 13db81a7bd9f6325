//! Mock auth helpers for integration tests.
//!
//! Services authenticate callers with `Authorization: Bearer <access token>`.
//! `MockAuth` signs tokens with a test secret so handlers can be driven without
//! the auth service.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;
use uuid::Uuid;

/// Configurable identity signed into test bearer tokens.
pub struct MockAuth {
    pub user_id: Uuid,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid, secret: impl Into<String>) -> Self {
        Self {
            user_id,
            secret: secret.into(),
        }
    }

    /// Signed token of the given `type` claim (`"access"` or `"refresh"`).
    pub fn token(&self, token_type: &str) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let claims = json!({
            "sub": self.user_id.to_string(),
            "type": token_type,
            "iat": now,
            "exp": now + 900,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("sign test token")
    }

    /// `Authorization` header value carrying an access token.
    pub fn bearer(&self) -> HeaderValue {
        Self::header_value(&self.token("access"))
    }

    /// `Authorization` header value carrying a refresh token, which services must reject.
    pub fn refresh_bearer(&self) -> HeaderValue {
        Self::header_value(&self.token("refresh"))
    }

    /// Headers for an authenticated request.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.bearer());
        map
    }

    fn header_value(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value")
    }
}
