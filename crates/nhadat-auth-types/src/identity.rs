//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::token::{AuthError, validate_access_token};

/// HMAC secret used to validate access tokens. Services expose it via `FromRef`.
#[derive(Debug, Clone)]
pub struct JwtSecret(pub String);

/// Caller identity taken from a valid `Authorization: Bearer <access token>` header.
///
/// As a required extractor it rejects with 401 when the header is absent, the token
/// is invalid or expired, or the token is a refresh token. As `Option<Identity>` it
/// yields `None` in all of those cases instead.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
}

enum Bearing {
    Missing,
    Rejected(AuthError),
    Valid(Identity),
}

fn authenticate(parts: &Parts, secret: &JwtSecret) -> Bearing {
    let Some(header) = parts.headers.typed_get::<Authorization<Bearer>>() else {
        return Bearing::Missing;
    };
    match validate_access_token(header.token(), &secret.0) {
        Ok(info) => Bearing::Valid(Identity {
            user_id: info.user_id,
            email: info.email,
            phone: info.phone,
        }),
        Err(e) => Bearing::Rejected(e),
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously, then return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let bearing = authenticate(parts, &JwtSecret::from_ref(state));

        async move {
            match bearing {
                Bearing::Valid(identity) => Ok(identity),
                Bearing::Missing => Err(StatusCode::UNAUTHORIZED),
                Bearing::Rejected(e) => {
                    tracing::debug!(error = %e, "bearer token rejected");
                    Err(StatusCode::UNAUTHORIZED)
                }
            }
        }
    }
}

impl<S> OptionalFromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let bearing = authenticate(parts, &JwtSecret::from_ref(state));

        async move {
            match bearing {
                Bearing::Valid(identity) => Ok(Some(identity)),
                Bearing::Missing | Bearing::Rejected(_) => Ok(None),
            }
        }
    }
}
