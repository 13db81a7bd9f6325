use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// `BDS-{CITY}-{YYMMDD}{NNNNN}`
    #[sea_orm(unique)]
    pub code: String,
    pub user_id: Uuid,
    /// `sell` | `rent`
    pub transaction_type: String,
    pub property_type_id: Option<Uuid>,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub highlights: Json,
    pub admin_unit_code: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_land: Option<f64>,
    pub area_floor: Option<f64>,
    pub frontage: Option<f64>,
    pub floors: Option<i32>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub direction: Option<String>,
    pub price: i64,
    pub price_unit: String,
    pub price_negotiable: bool,
    pub legal_status: Option<String>,
    pub ownership_type: Option<String>,
    pub is_mortgaged: bool,
    /// JSON array of strings.
    #[sea_orm(column_type = "JsonBinary")]
    pub amenities: Json,
    pub furniture: Option<String>,
    pub status: String,
    pub is_featured: bool,
    pub featured_until: Option<chrono::DateTime<chrono::Utc>>,
    #[sea_orm(unique)]
    pub slug: String,
    pub views: i32,
    pub saves: i32,
    pub contacts: i32,
    pub quality_score: f64,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
