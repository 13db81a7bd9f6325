use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::repository::{PasswordHasher, UserRepository};
use crate::domain::types::{Channel, User};
use crate::error::AuthServiceError;

async fn load_account<U: UserRepository>(users: &U, id: Uuid) -> Result<User, AuthServiceError> {
    users
        .find_by_id(id)
        .await?
        .ok_or(AuthServiceError::AccountNotFound)
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct GetProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, AuthServiceError> {
        load_account(&self.users, user_id).await
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

/// Fields a user may change on their own account. `None` leaves a field as is.
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    /// A changed phone or e-mail must be free and becomes unverified.
    pub async fn execute(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, AuthServiceError> {
        let mut user = load_account(&self.users, user_id).await?;

        if let Some(phone) = update.phone {
            if user.phone.as_deref() != Some(phone.as_str()) {
                if self
                    .users
                    .contact_taken(Channel::Phone, &phone, user.id)
                    .await?
                {
                    return Err(AuthServiceError::PhoneInUse);
                }
                user.phone = Some(phone);
                user.phone_verified = false;
            }
        }

        if let Some(email) = update.email {
            if user.email.as_deref() != Some(email.as_str()) {
                if self
                    .users
                    .contact_taken(Channel::Email, &email, user.id)
                    .await?
                {
                    return Err(AuthServiceError::EmailInUse);
                }
                user.email = Some(email);
                user.email_verified = false;
            }
        }

        if let Some(full_name) = update.full_name {
            user.full_name = Some(full_name);
        }

        user.updated_at = Utc::now();
        self.users.save(&user).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> ChangePasswordUseCase<U, H> {
    /// OTP-only accounts have no password to change.
    pub async fn execute(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthServiceError> {
        let mut user = load_account(&self.users, user_id).await?;
        let hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthServiceError::PasswordNotSet)?;
        if !self.hasher.verify(current_password, hash).await? {
            return Err(AuthServiceError::WrongCurrentPassword);
        }

        user.password_hash = Some(self.hasher.hash(new_password).await?);
        user.updated_at = Utc::now();
        self.users.save(&user).await?;
        info!(user_id = %user.id, "password changed");
        Ok(())
    }
}
