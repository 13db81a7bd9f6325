use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::{debug, info, warn};

use crate::domain::repository::OtpStore;
use crate::domain::types::{MOCK_OTP, OTP_TTL_SECS, OtpAttempt, OtpChallenge};
use crate::error::{AuthServiceError, OtpError};

/// How challenge codes are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpMode {
    /// Always [`MOCK_OTP`].
    Mock,
    /// Uniform 6-digit code in `100000..=999999`.
    Random,
}

impl OtpMode {
    /// `Random` in production, `Mock` everywhere else.
    pub fn for_environment(app_env: &str) -> Self {
        if app_env == "production" {
            Self::Random
        } else {
            Self::Mock
        }
    }

    fn generate(self) -> String {
        match self {
            Self::Mock => MOCK_OTP.to_owned(),
            Self::Random => rand::rng().random_range(100_000..=999_999u32).to_string(),
        }
    }
}

/// Issues and checks one-time passwords for phone numbers and e-mail addresses.
///
/// At most one live challenge exists per identifier. A challenge is consumed by a
/// successful verification and discarded once expired or after
/// [`OTP_MAX_ATTEMPTS`](crate::domain::types::OTP_MAX_ATTEMPTS) wrong guesses.
pub struct OtpEngine<S: OtpStore> {
    pub store: S,
    pub mode: OtpMode,
}

impl<S: OtpStore> OtpEngine<S> {
    /// Issue a new challenge for `identifier`.
    ///
    /// Fails with [`OtpError::RateLimited`] while an unexpired challenge exists.
    /// Delivery is an external concern; the code is logged.
    pub async fn send(&self, identifier: &str) -> Result<(), AuthServiceError> {
        let now = Utc::now();

        // Best-effort sweep; a failure here must not block issuing.
        match self.store.purge_expired(now).await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "purged expired otp challenges"),
            Err(e) => warn!(error = %e, "otp sweep failed"),
        }

        let challenge = OtpChallenge {
            identifier: identifier.to_owned(),
            code: self.mode.generate(),
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            attempts: 0,
        };
        if !self.store.insert_if_vacant(&challenge, now).await? {
            return Err(OtpError::RateLimited.into());
        }

        info!(
            identifier,
            code = %challenge.code,
            expires_at = %challenge.expires_at.to_rfc3339(),
            "otp issued"
        );
        Ok(())
    }

    /// Check `code` against the live challenge for `identifier`.
    ///
    /// A wrong code uses up one attempt. The attempt that reaches the limit
    /// discards the challenge and reports [`OtpError::AttemptsExhausted`].
    pub async fn verify(&self, identifier: &str, code: &str) -> Result<(), AuthServiceError> {
        match self.store.attempt(identifier, code, Utc::now()).await? {
            OtpAttempt::Accepted => {
                info!(identifier, "otp verified");
                Ok(())
            }
            OtpAttempt::Missing => Err(OtpError::NotFound.into()),
            OtpAttempt::Expired => Err(OtpError::Expired.into()),
            OtpAttempt::Exhausted => Err(OtpError::AttemptsExhausted.into()),
            OtpAttempt::Rejected { remaining } => Err(OtpError::InvalidCode { remaining }.into()),
        }
    }
}
