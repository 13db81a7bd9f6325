use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::repository::OtpStore;
use crate::domain::types::{OtpAttempt, OtpChallenge};
use crate::error::AuthServiceError;

/// Process-local OTP store. Challenges are not visible to other instances.
///
/// Clones share the same map.
#[derive(Clone, Default)]
pub struct InMemoryOtpStore {
    entries: Arc<Mutex<HashMap<String, OtpChallenge>>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Insert or replace a challenge unconditionally.
    pub async fn put(&self, challenge: OtpChallenge) {
        self.entries
            .lock()
            .await
            .insert(challenge.identifier.clone(), challenge);
    }
}

impl OtpStore for InMemoryOtpStore {
    async fn get(&self, identifier: &str) -> Result<Option<OtpChallenge>, AuthServiceError> {
        Ok(self.entries.lock().await.get(identifier).cloned())
    }

    async fn insert_if_vacant(
        &self,
        challenge: &OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        let mut entries = self.entries.lock().await;
        if entries
            .get(&challenge.identifier)
            .is_some_and(|existing| !existing.is_expired(now))
        {
            return Ok(false);
        }
        entries.insert(challenge.identifier.clone(), challenge.clone());
        Ok(true)
    }

    async fn attempt(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpAttempt, AuthServiceError> {
        let mut entries = self.entries.lock().await;
        let Some(challenge) = entries.get_mut(identifier) else {
            return Ok(OtpAttempt::Missing);
        };
        let outcome = challenge.attempt(code, now);
        if !outcome.keeps_challenge() {
            entries.remove(identifier);
        }
        Ok(outcome)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthServiceError> {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, challenge| !challenge.is_expired(now));
        Ok(before - entries.len())
    }
}
