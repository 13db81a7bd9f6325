use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use nhadat_auth_types::identity::JwtSecret;

use crate::infra::db::DbUserRepository;
use crate::infra::otp_store::OtpBackend;
use crate::infra::password::BcryptHasher;
use crate::usecase::otp::{OtpEngine, OtpMode};
use crate::usecase::token::TokenService;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub otp_store: OtpBackend,
    pub otp_mode: OtpMode,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_engine(&self) -> OtpEngine<OtpBackend> {
        OtpEngine {
            store: self.otp_store.clone(),
            mode: self.otp_mode,
        }
    }

    pub fn password_hasher(&self) -> BcryptHasher {
        BcryptHasher {
            cost: self.bcrypt_cost,
        }
    }
}

impl FromRef<AppState> for JwtSecret {
    fn from_ref(state: &AppState) -> Self {
        JwtSecret(state.tokens.secret().to_owned())
    }
}
