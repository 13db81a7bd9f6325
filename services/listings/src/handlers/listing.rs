use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use nhadat_auth_types::identity::Identity;
use nhadat_domain::listing::{ListingSortField, ListingStatus, TransactionType};
use nhadat_domain::pagination::{Page, PageRequest, Sort};

use crate::domain::types::{Counter, Listing, ListingFilter, ListingPatch, NewListing, QualityInfo};
use crate::error::ListingsServiceError;
use crate::state::AppState;
use crate::usecase::listing::{
    CreateListingUseCase, DeleteListingUseCase, GetListingByCodeUseCase, GetListingBySlugUseCase,
    GetListingUseCase, GetQualityInfoUseCase, ListMyListingsUseCase, PublishListingUseCase,
    RecordEngagementUseCase, SearchListingsUseCase, UpdateListingUseCase,
};

fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
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
    #[serde(serialize_with = "nhadat_core::serde::opt_to_rfc3339_ms")]
    pub featured_until: Option<DateTime<Utc>>,
    pub slug: String,
    pub views: i32,
    pub saves: i32,
    pub contacts: i32,
    pub quality_score: f64,
    #[serde(serialize_with = "nhadat_core::serde::opt_to_rfc3339_ms")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "nhadat_core::serde::opt_to_rfc3339_ms")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "nhadat_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "nhadat_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Listing> for ListingResponse {
    fn from(l: Listing) -> Self {
        Self {
            id: l.id,
            code: l.code,
            user_id: l.user_id,
            transaction_type: l.transaction_type,
            property_type_id: l.property_type_id,
            title: l.title,
            description: l.description,
            highlights: l.highlights,
            admin_unit_code: l.admin_unit_code,
            address: l.address,
            street: l.street,
            latitude: l.latitude,
            longitude: l.longitude,
            area_land: l.area_land,
            area_floor: l.area_floor,
            frontage: l.frontage,
            floors: l.floors,
            bedrooms: l.bedrooms,
            bathrooms: l.bathrooms,
            direction: l.direction,
            price: l.price,
            price_unit: l.price_unit,
            price_negotiable: l.price_negotiable,
            legal_status: l.legal_status,
            ownership_type: l.ownership_type,
            is_mortgaged: l.is_mortgaged,
            amenities: l.amenities,
            furniture: l.furniture,
            status: l.status,
            is_featured: l.is_featured,
            featured_until: l.featured_until,
            slug: l.slug,
            views: l.views,
            saves: l.saves,
            contacts: l.contacts,
            quality_score: l.quality_score,
            expires_at: l.expires_at,
            published_at: l.published_at,
            created_at: l.created_at,
            updated_at: l.updated_at,
        }
    }
}

// ── Request bodies ───────────────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    #[serde(default)]
    pub transaction_type: TransactionType,
    pub property_type_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[validate(length(min = 1, max = 20, message = "adminUnitCode must be 1-20 characters"))]
    pub admin_unit_code: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(max = 200))]
    pub street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub area_land: Option<f64>,
    #[validate(range(min = 0.0))]
    pub area_floor: Option<f64>,
    #[validate(range(min = 0.0))]
    pub frontage: Option<f64>,
    #[validate(range(min = 0))]
    pub floors: Option<i32>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    #[validate(length(max = 20))]
    pub direction: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(length(max = 20))]
    pub price_unit: Option<String>,
    #[serde(default)]
    pub price_negotiable: bool,
    #[validate(length(max = 30))]
    pub legal_status: Option<String>,
    #[validate(length(max = 30))]
    pub ownership_type: Option<String>,
    #[serde(default)]
    pub is_mortgaged: bool,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[validate(length(max = 30))]
    pub furniture: Option<String>,
}

impl From<CreateListingRequest> for NewListing {
    fn from(r: CreateListingRequest) -> Self {
        Self {
            transaction_type: r.transaction_type,
            property_type_id: r.property_type_id,
            title: r.title,
            description: r.description,
            highlights: r.highlights,
            admin_unit_code: r.admin_unit_code,
            address: r.address,
            street: r.street,
            latitude: r.latitude,
            longitude: r.longitude,
            area_land: r.area_land,
            area_floor: r.area_floor,
            frontage: r.frontage,
            floors: r.floors,
            bedrooms: r.bedrooms,
            bathrooms: r.bathrooms,
            direction: r.direction,
            price: r.price,
            price_unit: r.price_unit,
            price_negotiable: r.price_negotiable,
            legal_status: r.legal_status,
            ownership_type: r.ownership_type,
            is_mortgaged: r.is_mortgaged,
            amenities: r.amenities,
            furniture: r.furniture,
        }
    }
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListingRequest {
    pub transaction_type: Option<TransactionType>,
    pub property_type_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub highlights: Option<Vec<String>>,
    #[validate(length(min = 1, max = 20, message = "adminUnitCode must be 1-20 characters"))]
    pub admin_unit_code: Option<String>,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: Option<String>,
    #[validate(length(max = 200))]
    pub street: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub area_land: Option<f64>,
    #[validate(range(min = 0.0))]
    pub area_floor: Option<f64>,
    #[validate(range(min = 0.0))]
    pub frontage: Option<f64>,
    #[validate(range(min = 0))]
    pub floors: Option<i32>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    #[validate(length(max = 20))]
    pub direction: Option<String>,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: Option<i64>,
    #[validate(length(max = 20))]
    pub price_unit: Option<String>,
    pub price_negotiable: Option<bool>,
    #[validate(length(max = 30))]
    pub legal_status: Option<String>,
    #[validate(length(max = 30))]
    pub ownership_type: Option<String>,
    pub is_mortgaged: Option<bool>,
    pub amenities: Option<Vec<String>>,
    #[validate(length(max = 30))]
    pub furniture: Option<String>,
}

impl From<UpdateListingRequest> for ListingPatch {
    fn from(r: UpdateListingRequest) -> Self {
        Self {
            transaction_type: r.transaction_type,
            property_type_id: r.property_type_id,
            title: r.title,
            description: r.description,
            highlights: r.highlights,
            admin_unit_code: r.admin_unit_code,
            address: r.address,
            street: r.street,
            latitude: r.latitude,
            longitude: r.longitude,
            area_land: r.area_land,
            area_floor: r.area_floor,
            frontage: r.frontage,
            floors: r.floors,
            bedrooms: r.bedrooms,
            bathrooms: r.bathrooms,
            direction: r.direction,
            price: r.price,
            price_unit: r.price_unit,
            price_negotiable: r.price_negotiable,
            legal_status: r.legal_status,
            ownership_type: r.ownership_type,
            is_mortgaged: r.is_mortgaged,
            amenities: r.amenities,
            furniture: r.furniture,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub transaction_type: Option<TransactionType>,
    pub property_type_id: Option<Uuid>,
    pub admin_unit_code: Option<String>,
    #[validate(range(min = 0))]
    pub min_price: Option<i64>,
    #[validate(range(min = 0))]
    pub max_price: Option<i64>,
    #[validate(range(min = 0.0))]
    pub min_area: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_area: Option<f64>,
    #[validate(range(min = 0))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0))]
    pub bathrooms: Option<i32>,
    pub direction: Option<String>,
    pub status: Option<ListingStatus>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,
    /// Out-of-range values are clamped, not rejected.
    pub limit: Option<u32>,
}

impl ListingQuery {
    fn into_parts(self) -> (ListingFilter, PageRequest) {
        let defaults = PageRequest::default();
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
        };
        let filter = ListingFilter {
            transaction_type: self.transaction_type,
            property_type_id: self.property_type_id,
            admin_unit_code: self.admin_unit_code,
            min_price: self.min_price,
            max_price: self.max_price,
            min_area: self.min_area,
            max_area: self.max_area,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            direction: self.direction,
            status: self.status,
            is_featured: self.is_featured,
            search: self.search,
            sort_by: self
                .sort_by
                .as_deref()
                .map(ListingSortField::from_param)
                .unwrap_or_default(),
            sort_order: self
                .sort_order
                .as_deref()
                .and_then(Sort::from_param)
                .unwrap_or_default(),
        };
        (filter, page)
    }
}

// ── POST /listings ───────────────────────────────────────────────────────────

pub async fn create_listing(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), ListingsServiceError> {
    body.validate()?;

    let uc = CreateListingUseCase {
        repo: state.listing_repo(),
    };
    let listing = uc.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(listing.into())))
}

// ── GET /listings ────────────────────────────────────────────────────────────

pub async fn search_listings(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page<ListingResponse>>, ListingsServiceError> {
    let query: ListingQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| ListingsServiceError::Validation(e.to_string()))?
        .unwrap_or_default();
    query.validate()?;

    let (filter, page) = query.into_parts();
    let uc = SearchListingsUseCase {
        repo: state.listing_repo(),
    };
    let result = uc.execute(filter, page).await?;
    Ok(Json(result.map(ListingResponse::from)))
}

// ── GET /listings/user/my-listings ───────────────────────────────────────────

pub async fn get_my_listings(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ListingResponse>>, ListingsServiceError> {
    let uc = ListMyListingsUseCase {
        repo: state.listing_repo(),
    };
    let listings = uc.execute(identity.user_id).await?;
    Ok(Json(listings.into_iter().map(ListingResponse::from).collect()))
}

// ── GET /listings/{id}, /listings/code/{code}, /listings/slug/{slug} ─────────

/// Public. A valid bearer token identifies the owner so their own views are not counted.
pub async fn get_listing(
    identity: Option<Identity>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingResponse>, ListingsServiceError> {
    let uc = GetListingUseCase {
        repo: state.listing_repo(),
    };
    let listing = uc.execute(id, identity.map(|i| i.user_id)).await?;
    Ok(Json(listing.into()))
}

pub async fn get_listing_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ListingResponse>, ListingsServiceError> {
    let uc = GetListingByCodeUseCase {
        repo: state.listing_repo(),
    };
    Ok(Json(uc.execute(&code).await?.into()))
}

pub async fn get_listing_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ListingResponse>, ListingsServiceError> {
    let uc = GetListingBySlugUseCase {
        repo: state.listing_repo(),
    };
    Ok(Json(uc.execute(&slug).await?.into()))
}

// ── PUT /listings/{id}, DELETE /listings/{id} ────────────────────────────────

pub async fn update_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateListingRequest>,
) -> Result<Json<ListingResponse>, ListingsServiceError> {
    body.validate()?;

    let uc = UpdateListingUseCase {
        repo: state.listing_repo(),
    };
    let listing = uc.execute(id, identity.user_id, body.into()).await?;
    Ok(Json(listing.into()))
}

pub async fn delete_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ListingsServiceError> {
    let uc = DeleteListingUseCase {
        repo: state.listing_repo(),
    };
    uc.execute(id, identity.user_id).await?;
    Ok(message("Listing deleted successfully"))
}

// ── POST /listings/{id}/publish ──────────────────────────────────────────────

pub async fn publish_listing(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListingResponse>, ListingsServiceError> {
    let uc = PublishListingUseCase {
        repo: state.listing_repo(),
    };
    let listing = uc.execute(id, identity.user_id).await?;
    Ok(Json(listing.into()))
}

// ── POST /listings/{id}/save, POST /listings/{id}/contact ────────────────────

pub async fn save_listing(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ListingsServiceError> {
    let uc = RecordEngagementUseCase {
        repo: state.listing_repo(),
    };
    uc.execute(id, Counter::Saves).await?;
    Ok(message("Listing saved"))
}

pub async fn contact_listing(
    _identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ListingsServiceError> {
    let uc = RecordEngagementUseCase {
        repo: state.listing_repo(),
    };
    uc.execute(id, Counter::Contacts).await?;
    Ok(message("Contact recorded"))
}

// ── GET /listings/{id}/quality ───────────────────────────────────────────────

pub async fn get_quality(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QualityInfo>, ListingsServiceError> {
    let uc = GetQualityInfoUseCase {
        repo: state.listing_repo(),
    };
    Ok(Json(uc.execute(id, identity.user_id).await?))
}
