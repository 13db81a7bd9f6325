use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, SqlErr,
};
use serde_json::json;
use uuid::Uuid;

use nhadat_auth_schema::users;
use nhadat_domain::user::{UserStatus, UserType};

use crate::domain::repository::UserRepository;
use crate::domain::types::{Channel, User};
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Phone.eq(identifier))
                    .add(users::Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .context("find user by identifier")?;
        Ok(model.map(user_from_model))
    }

    async fn exists_by_phone_or_email(
        &self,
        phone: Option<&str>,
        email: Option<&str>,
    ) -> Result<bool, AuthServiceError> {
        let mut condition = Condition::any();
        if let Some(phone) = phone {
            condition = condition.add(users::Column::Phone.eq(phone));
        }
        if let Some(email) = email {
            condition = condition.add(users::Column::Email.eq(email));
        }
        if condition.is_empty() {
            return Ok(false);
        }
        let count = users::Entity::find()
            .filter(condition)
            .count(&self.db)
            .await
            .context("count users by phone or email")?;
        Ok(count > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn contact_taken(
        &self,
        channel: Channel,
        value: &str,
        except: Uuid,
    ) -> Result<bool, AuthServiceError> {
        let column = match channel {
            Channel::Phone => users::Column::Phone,
            Channel::Email => users::Column::Email,
        };
        let count = users::Entity::find()
            .filter(column.eq(value))
            .filter(users::Column::Id.ne(except))
            .count(&self.db)
            .await
            .context("count users by contact")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            phone: Set(user.phone.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            status: Set(user.status.to_string()),
            phone_verified: Set(user.phone_verified),
            email_verified: Set(user.email_verified),
            settings: Set(json!({ "userType": user.user_type })),
            last_login_at: Set(user.last_login_at),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AuthServiceError::UserAlreadyExists,
            None => AuthServiceError::Internal(anyhow::Error::new(e).context("create user")),
        })?;
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            phone: Set(user.phone.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            full_name: Set(user.full_name.clone()),
            phone_verified: Set(user.phone_verified),
            email_verified: Set(user.email_verified),
            updated_at: Set(user.updated_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(Channel::Phone) => AuthServiceError::PhoneInUse,
            Some(Channel::Email) => AuthServiceError::EmailInUse,
            None => AuthServiceError::Internal(anyhow::Error::new(e).context("save user")),
        })?;
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid, channel: Channel) -> Result<(), AuthServiceError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        match channel {
            Channel::Phone => am.phone_verified = Set(true),
            Channel::Email => am.email_verified = Set(true),
        }
        am.update(&self.db).await.context("mark user verified")?;
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            last_login_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("record user login")?;
        Ok(())
    }
}

/// Which contact column a unique-constraint violation hit, if any.
fn unique_violation(e: &DbErr) -> Option<Channel> {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => Some(violated_channel(&msg)),
        _ => None,
    }
}

/// Postgres names the constraint `users_<column>_key`.
fn violated_channel(message: &str) -> Channel {
    if message.contains("email") {
        Channel::Email
    } else {
        Channel::Phone
    }
}

fn user_from_model(model: users::Model) -> User {
    let status = model.status.parse().unwrap_or_else(|_| {
        tracing::warn!(user_id = %model.id, status = %model.status, "unknown user status");
        UserStatus::Inactive
    });
    let user_type = model
        .settings
        .get("userType")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<UserType>().ok())
        .unwrap_or_default();
    User {
        id: model.id,
        phone: model.phone,
        email: model.email,
        password_hash: model.password_hash,
        full_name: model.full_name,
        status,
        phone_verified: model.phone_verified,
        email_verified: model.email_verified,
        user_type,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
