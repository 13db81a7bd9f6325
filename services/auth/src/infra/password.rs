use anyhow::Context as _;

use crate::domain::repository::PasswordHasher;
use crate::error::AuthServiceError;

/// bcrypt hashing, run on the blocking thread pool.
#[derive(Clone)]
pub struct BcryptHasher {
    pub cost: u32,
}

impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plain: &str) -> Result<String, AuthServiceError> {
        let plain = plain.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
            .await
            .context("join bcrypt hash task")?
            .context("bcrypt hash")?;
        Ok(hash)
    }

    async fn verify(&self, plain: &str, hash: &str) -> Result<bool, AuthServiceError> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hash))
            .await
            .context("join bcrypt verify task")?
            .context("bcrypt verify")?;
        Ok(ok)
    }
}
