use chrono::{DateTime, Utc};

use crate::domain::repository::OtpStore;
use crate::domain::types::{OtpAttempt, OtpChallenge};
use crate::error::AuthServiceError;
use crate::infra::cache::RedisOtpStore;
use crate::infra::memory::InMemoryOtpStore;

/// OTP store selected at startup: Redis when `REDIS_URL` is set, otherwise in-process.
#[derive(Clone)]
pub enum OtpBackend {
    Memory(InMemoryOtpStore),
    Redis(RedisOtpStore),
}

impl OtpStore for OtpBackend {
    async fn get(&self, identifier: &str) -> Result<Option<OtpChallenge>, AuthServiceError> {
        match self {
            Self::Memory(store) => store.get(identifier).await,
            Self::Redis(store) => store.get(identifier).await,
        }
    }

    async fn insert_if_vacant(
        &self,
        challenge: &OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        match self {
            Self::Memory(store) => store.insert_if_vacant(challenge, now).await,
            Self::Redis(store) => store.insert_if_vacant(challenge, now).await,
        }
    }

    async fn attempt(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpAttempt, AuthServiceError> {
        match self {
            Self::Memory(store) => store.attempt(identifier, code, now).await,
            Self::Redis(store) => store.attempt(identifier, code, now).await,
        }
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthServiceError> {
        match self {
            Self::Memory(store) => store.purge_expired(now).await,
            Self::Redis(store) => store.purge_expired(now).await,
        }
    }
}
