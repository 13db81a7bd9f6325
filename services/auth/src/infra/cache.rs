use chrono::{DateTime, Utc};
use deadpool_redis::Pool;
use deadpool_redis::redis::{self, AsyncCommands, RedisError};

use crate::domain::repository::OtpStore;
use crate::domain::types::{OTP_MAX_ATTEMPTS, OtpAttempt, OtpChallenge};
use crate::error::AuthServiceError;

/// OTP challenges in Redis, one JSON value per identifier with a native TTL.
/// Shared by every auth instance behind the load balancer.
#[derive(Clone)]
pub struct RedisOtpStore {
    pub pool: Pool,
}

fn otp_key(identifier: &str) -> String {
    format!("otp:{identifier}")
}

/// Checks ARGV[1] against the challenge at KEYS[1] with limit ARGV[2].
/// Runs as one server-side step. Expiry is left to the key TTL.
const ATTEMPT_SCRIPT: &str = r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
  return {'missing', 0}
end
local challenge = cjson.decode(raw)
local limit = tonumber(ARGV[2])
if challenge.attempts >= limit then
  redis.call('DEL', KEYS[1])
  return {'exhausted', challenge.attempts}
end
if challenge.code == ARGV[1] then
  redis.call('DEL', KEYS[1])
  return {'accepted', challenge.attempts}
end
challenge.attempts = challenge.attempts + 1
if challenge.attempts >= limit then
  redis.call('DEL', KEYS[1])
  return {'exhausted', challenge.attempts}
end
redis.call('SET', KEYS[1], cjson.encode(challenge), 'KEEPTTL')
return {'rejected', challenge.attempts}
"#;

fn internal(e: RedisError) -> AuthServiceError {
    AuthServiceError::Internal(e.into())
}

/// Map the script reply onto an outcome.
fn attempt_outcome(status: &str, attempts: u32) -> Result<OtpAttempt, AuthServiceError> {
    match status {
        "missing" => Ok(OtpAttempt::Missing),
        "accepted" => Ok(OtpAttempt::Accepted),
        "exhausted" => Ok(OtpAttempt::Exhausted),
        "rejected" => Ok(OtpAttempt::Rejected {
            remaining: OTP_MAX_ATTEMPTS.saturating_sub(attempts),
        }),
        other => Err(AuthServiceError::Internal(anyhow::anyhow!(
            "unexpected otp script reply: {other}"
        ))),
    }
}

impl OtpStore for RedisOtpStore {
    async fn get(&self, identifier: &str) -> Result<Option<OtpChallenge>, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let value: Option<String> = conn.get(otp_key(identifier)).await.map_err(internal)?;
        value
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(|e| AuthServiceError::Internal(e.into()))
    }

    async fn insert_if_vacant(
        &self,
        challenge: &OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let raw =
            serde_json::to_string(challenge).map_err(|e| AuthServiceError::Internal(e.into()))?;
        // Expired keys are already gone, so NX only refuses live challenges.
        let stored: Option<String> = redis::cmd("SET")
            .arg(otp_key(&challenge.identifier))
            .arg(raw)
            .arg("NX")
            .arg("EX")
            .arg(remaining_secs(challenge.expires_at, now))
            .query_async(&mut conn)
            .await
            .map_err(internal)?;
        Ok(stored.is_some())
    }

    async fn attempt(
        &self,
        identifier: &str,
        code: &str,
        _now: DateTime<Utc>,
    ) -> Result<OtpAttempt, AuthServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let (status, attempts): (String, u32) = redis::cmd("EVAL")
            .arg(ATTEMPT_SCRIPT)
            .arg(1)
            .arg(otp_key(identifier))
            .arg(code)
            .arg(OTP_MAX_ATTEMPTS)
            .query_async(&mut conn)
            .await
            .map_err(internal)?;
        attempt_outcome(&status, attempts)
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<usize, AuthServiceError> {
        // Redis evicts expired keys itself.
        Ok(0)
    }
}

/// Seconds until `expires_at`, never below 1 so `SET EX` accepts it.
fn remaining_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    (expires_at - now).num_seconds().max(1) as u64
}
