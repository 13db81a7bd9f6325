use sea_orm::entity::prelude::*;

/// Marketplace account. Either `phone` or `email` (or both) identifies the user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub phone: Option<String>,
    #[sea_orm(unique)]
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    /// `active` | `inactive` | `banned`
    pub status: String,
    pub phone_verified: bool,
    pub email_verified: bool,
    /// Free-form settings; `userType` lives here.
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: Json,
    pub last_login_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
