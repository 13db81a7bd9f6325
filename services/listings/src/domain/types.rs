use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use nhadat_domain::listing::{ListingSortField, ListingStatus, TransactionType};
use nhadat_domain::pagination::Sort;

/// Minimum quality score a draft needs before it can be submitted for review.
pub const PUBLISH_MIN_SCORE: f64 = 4.0;

/// Price unit stored when the owner does not give one.
pub const DEFAULT_PRICE_UNIT: &str = "total";

/// A property offered for sale or rent.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: Uuid,
    pub code: String,
    pub user_id: Uuid,
    pub transaction_type: TransactionType,
    pub property_type_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub highlights: Vec<String>,
    pub admin_unit_code: String,
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
    pub amenities: Vec<String>,
    pub furniture: Option<String>,
    pub status: ListingStatus,
    pub is_featured: bool,
    pub featured_until: Option<DateTime<Utc>>,
    pub slug: String,
    pub views: i32,
    pub saves: i32,
    pub contacts: i32,
    pub quality_score: f64,
    pub expires_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Owner-supplied fields of a new listing.
#[derive(Debug, Clone, Default)]
pub struct NewListing {
    pub transaction_type: TransactionType,
    pub property_type_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub highlights: Vec<String>,
    pub admin_unit_code: String,
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
    pub price_unit: Option<String>,
    pub price_negotiable: bool,
    pub legal_status: Option<String>,
    pub ownership_type: Option<String>,
    pub is_mortgaged: bool,
    pub amenities: Vec<String>,
    pub furniture: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub transaction_type: Option<TransactionType>,
    pub property_type_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlights: Option<Vec<String>>,
    pub admin_unit_code: Option<String>,
    pub address: Option<String>,
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
    pub price: Option<i64>,
    pub price_unit: Option<String>,
    pub price_negotiable: Option<bool>,
    pub legal_status: Option<String>,
    pub ownership_type: Option<String>,
    pub is_mortgaged: Option<bool>,
    pub amenities: Option<Vec<String>>,
    pub furniture: Option<String>,
}

impl ListingPatch {
    /// Copy every supplied field onto `listing`. The slug and score are left to the caller.
    pub fn apply_to(self, listing: &mut Listing) {
        if let Some(v) = self.transaction_type {
            listing.transaction_type = v;
        }
        if let Some(v) = self.title {
            listing.title = v;
        }
        if let Some(v) = self.highlights {
            listing.highlights = v;
        }
        if let Some(v) = self.admin_unit_code {
            listing.admin_unit_code = v;
        }
        if let Some(v) = self.address {
            listing.address = v;
        }
        if let Some(v) = self.price {
            listing.price = v;
        }
        if let Some(v) = self.price_unit {
            listing.price_unit = v;
        }
        if let Some(v) = self.price_negotiable {
            listing.price_negotiable = v;
        }
        if let Some(v) = self.is_mortgaged {
            listing.is_mortgaged = v;
        }
        if let Some(v) = self.amenities {
            listing.amenities = v;
        }
        if self.property_type_id.is_some() {
            listing.property_type_id = self.property_type_id;
        }
        if self.description.is_some() {
            listing.description = self.description;
        }
        if self.street.is_some() {
            listing.street = self.street;
        }
        if self.latitude.is_some() {
            listing.latitude = self.latitude;
        }
        if self.longitude.is_some() {
            listing.longitude = self.longitude;
        }
        if self.area_land.is_some() {
            listing.area_land = self.area_land;
        }
        if self.area_floor.is_some() {
            listing.area_floor = self.area_floor;
        }
        if self.frontage.is_some() {
            listing.frontage = self.frontage;
        }
        if self.floors.is_some() {
            listing.floors = self.floors;
        }
        if self.bedrooms.is_some() {
            listing.bedrooms = self.bedrooms;
        }
        if self.bathrooms.is_some() {
            listing.bathrooms = self.bathrooms;
        }
        if self.direction.is_some() {
            listing.direction = self.direction;
        }
        if self.legal_status.is_some() {
            listing.legal_status = self.legal_status;
        }
        if self.ownership_type.is_some() {
            listing.ownership_type = self.ownership_type;
        }
        if self.furniture.is_some() {
            listing.furniture = self.furniture;
        }
    }
}

/// Engagement counters bumped by other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Saves,
    Contacts,
}

/// Search criteria for `GET /listings`. Every set field narrows the result.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub transaction_type: Option<TransactionType>,
    pub property_type_id: Option<Uuid>,
    pub admin_unit_code: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Matches when either land or floor area is at least this.
    pub min_area: Option<f64>,
    /// Matches when either land or floor area is at most this.
    pub max_area: Option<f64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub direction: Option<String>,
    pub status: Option<ListingStatus>,
    pub is_featured: Option<bool>,
    /// Case-insensitive substring of title, description or address.
    pub search: Option<String>,
    pub sort_by: ListingSortField,
    pub sort_order: Sort,
}

/// Coarse bucket for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityCategory {
    Low,
    Medium,
    High,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityInfo {
    pub score: f64,
    pub category: QualityCategory,
    pub suggestions: Vec<String>,
}
