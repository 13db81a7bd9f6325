use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nhadat_domain::user::{UserStatus, UserType};

/// Marketplace account as seen by the auth service.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// `None` for OTP-only accounts.
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub status: UserStatus,
    pub phone_verified: bool,
    pub email_verified: bool,
    pub user_type: UserType,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The channel an OTP sent to `identifier` proves ownership of.
    pub fn channel_for(&self, identifier: &str) -> Channel {
        if self.phone.as_deref() == Some(identifier) {
            Channel::Phone
        } else {
            Channel::Email
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Verifiable contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Phone,
    Email,
}

/// Live one-time-password challenge, keyed by identifier (phone or e-mail).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub identifier: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: u32,
}

impl OtpChallenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Apply one guess. A wrong guess uses up an attempt. Stores call this
    /// while holding the challenge exclusively and keep it only when the
    /// outcome is [`OtpAttempt::Rejected`].
    pub fn attempt(&mut self, code: &str, now: DateTime<Utc>) -> OtpAttempt {
        if self.is_expired(now) {
            return OtpAttempt::Expired;
        }
        if self.attempts >= OTP_MAX_ATTEMPTS {
            return OtpAttempt::Exhausted;
        }
        if self.code == code {
            return OtpAttempt::Accepted;
        }
        self.attempts += 1;
        if self.attempts >= OTP_MAX_ATTEMPTS {
            OtpAttempt::Exhausted
        } else {
            OtpAttempt::Rejected {
                remaining: OTP_MAX_ATTEMPTS - self.attempts,
            }
        }
    }
}

/// Result of checking a code against the stored challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpAttempt {
    /// No challenge for the identifier.
    Missing,
    Expired,
    /// The limit was reached; the challenge is gone.
    Exhausted,
    /// Wrong code; the challenge stays with `remaining` guesses left.
    Rejected { remaining: u32 },
    /// Right code; the challenge is consumed.
    Accepted,
}

impl OtpAttempt {
    pub fn keeps_challenge(self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// OTP challenge time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 300;

/// Wrong guesses allowed before a challenge is discarded.
pub const OTP_MAX_ATTEMPTS: u32 = 3;

/// Fixed code issued outside production.
pub const MOCK_OTP: &str = "123456";

/// Access-token lifetime in seconds (15 minutes).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 15 * 60;

/// Refresh-token lifetime in seconds (30 days).
pub const REFRESH_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// bcrypt cost factor for stored passwords.
pub const BCRYPT_COST: u32 = 12;
