use sea_orm::entity::prelude::*;

/// Per-(admin unit, UTC day) counter backing listing codes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_code_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub admin_unit_code: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub day: Date,
    pub value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
