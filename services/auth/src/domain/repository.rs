#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{Channel, OtpAttempt, OtpChallenge, User};
use crate::error::AuthServiceError;

/// Repository for marketplace accounts.
pub trait UserRepository: Send + Sync {
    /// Find the user whose phone or e-mail equals `identifier`.
    async fn find_by_identifier(&self, identifier: &str)
    -> Result<Option<User>, AuthServiceError>;

    /// Whether any user already owns the given phone or e-mail. `None` values are ignored.
    async fn exists_by_phone_or_email(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError>;

    /// Whether a user other than `except` already owns `value` on `channel`.
    async fn contact_taken(
        &self,
        channel: Channel,
        value: &str,
        except: Uuid,
    ) -> Result<bool, AuthServiceError>;

    /// Insert a new user. A phone or e-mail taken meanwhile yields
    /// [`AuthServiceError::UserAlreadyExists`].
    async fn create(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Persist contact, name, verification and password fields of an existing user.
    /// A phone or e-mail taken meanwhile yields `PhoneInUse` or `EmailInUse`.
    async fn save(&self, user: &User) -> Result<(), AuthServiceError>;

    /// Set `phone_verified` or `email_verified`.
    async fn mark_verified(&self, id: Uuid, channel: Channel) -> Result<(), AuthServiceError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError>;
}

/// Ephemeral keyed-expiry store for OTP challenges.
///
/// Implementations must stop returning a challenge once it has expired or been
/// consumed. `insert_if_vacant` and `attempt` are atomic per identifier: two
/// concurrent callers never both observe the same state.
pub trait OtpStore: Send + Sync {
    async fn get(&self, identifier: &str) -> Result<Option<OtpChallenge>, AuthServiceError>;

    /// Store `challenge` unless an unexpired one exists for its identifier.
    /// Returns `false` when the slot was taken.
    async fn insert_if_vacant(
        &self,
        challenge: &OtpChallenge,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError>;

    /// Check `code` with [`OtpChallenge::attempt`] and persist the outcome in one step.
    async fn attempt(
        &self,
        identifier: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpAttempt, AuthServiceError>;

    /// Drop every challenge expired at `now`. Returns how many were dropped.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthServiceError>;
}

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> Result<String, AuthServiceError>;

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AuthServiceError>;
}
