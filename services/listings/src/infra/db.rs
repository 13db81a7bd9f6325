use anyhow::Context as _;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, SqlErr, Statement, sea_query::Expr,
};
use uuid::Uuid;

use nhadat_core::sea_ext::ContainsAnyIgnoreCase as _;
use nhadat_domain::listing::{ListingSortField, ListingStatus, TransactionType};
use nhadat_domain::pagination::{Page, PageRequest, Sort};
use nhadat_listings_schema::listings;

use crate::domain::repository::ListingRepository;
use crate::domain::types::{Counter, Listing, ListingFilter};
use crate::error::ListingsServiceError;

/// Bumps the (admin unit, day) counter in one statement so concurrent creates
/// never observe the same value.
const NEXT_CODE_SEQUENCE_SQL: &str = r#"
    INSERT INTO listing_code_sequences (admin_unit_code, day, value)
    VALUES ($1, $2, 1)
    ON CONFLICT (admin_unit_code, day)
    DO UPDATE SET value = listing_code_sequences.value + 1
    RETURNING value
"#;

#[derive(Clone)]
pub struct DbListingRepository {
    pub db: DatabaseConnection,
}

impl ListingRepository for DbListingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingsServiceError> {
        let model = listings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find listing by id")?;
        Ok(model.map(listing_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Listing>, ListingsServiceError> {
        let model = listings::Entity::find()
            .filter(listings::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find listing by code")?;
        Ok(model.map(listing_from_model))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingsServiceError> {
        let model = listings::Entity::find()
            .filter(listings::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .context("find listing by slug")?;
        Ok(model.map(listing_from_model))
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, ListingsServiceError> {
        let count = listings::Entity::find()
            .filter(listings::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .context("count listings by slug")?;
        Ok(count > 0)
    }

    async fn next_code_sequence(
        &self,
        admin_unit_code: &str,
        day: NaiveDate,
    ) -> Result<u32, ListingsServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct SequenceRow {
            value: i32,
        }

        let row = SequenceRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            NEXT_CODE_SEQUENCE_SQL,
            [admin_unit_code.into(), day.into()],
        ))
        .one(&self.db)
        .await
        .context("next listing code sequence")?
        .context("sequence upsert returned no row")?;
        let value = u32::try_from(row.value).context("negative listing code sequence")?;
        Ok(value)
    }

    async fn create(&self, listing: &Listing) -> Result<(), ListingsServiceError> {
        active_model(listing)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "create listing"))?;
        Ok(())
    }

    async fn save(&self, listing: &Listing) -> Result<(), ListingsServiceError> {
        active_model(listing)
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "save listing"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ListingsServiceError> {
        listings::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete listing")?;
        Ok(())
    }

    async fn increment(&self, id: Uuid, counter: Counter) -> Result<bool, ListingsServiceError> {
        let column = match counter {
            Counter::Views => listings::Column::Views,
            Counter::Saves => listings::Column::Saves,
            Counter::Contacts => listings::Column::Contacts,
        };
        let result = listings::Entity::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(listings::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("increment listing counter")?;
        Ok(result.rows_affected > 0)
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, ListingsServiceError> {
        let total = filtered(filter)
            .count(&self.db)
            .await
            .context("count listings")?;

        let models = search_query(filter)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("search listings")?;

        Ok(Page {
            data: models.into_iter().map(listing_from_model).collect(),
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, ListingsServiceError> {
        let models = listings::Entity::find()
            .filter(listings::Column::UserId.eq(user_id))
            .order_by_desc(listings::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list listings by owner")?;
        Ok(models.into_iter().map(listing_from_model).collect())
    }
}

/// Unique violation on the slug column, raised when a concurrent insert won.
fn is_slug_conflict(err: Option<SqlErr>) -> bool {
    matches!(err, Some(SqlErr::UniqueConstraintViolation(msg)) if msg.contains("slug"))
}

fn write_error(e: DbErr, context: &'static str) -> ListingsServiceError {
    if is_slug_conflict(e.sql_err()) {
        return ListingsServiceError::SlugTaken;
    }
    ListingsServiceError::Internal(anyhow::Error::new(e).context(context))
}

/// `SELECT` narrowed by every set field of `filter`, unordered.
fn filtered(filter: &ListingFilter) -> Select<listings::Entity> {
    let mut query = listings::Entity::find();

    if let Some(transaction_type) = filter.transaction_type {
        query = query.filter(listings::Column::TransactionType.eq(transaction_type.to_string()));
    }
    if let Some(property_type_id) = filter.property_type_id {
        query = query.filter(listings::Column::PropertyTypeId.eq(property_type_id));
    }
    if let Some(code) = filter.admin_unit_code.as_deref() {
        query = query.filter(listings::Column::AdminUnitCode.eq(code));
    }
    if let Some(bedrooms) = filter.bedrooms {
        query = query.filter(listings::Column::Bedrooms.eq(bedrooms));
    }
    if let Some(bathrooms) = filter.bathrooms {
        query = query.filter(listings::Column::Bathrooms.eq(bathrooms));
    }
    if let Some(direction) = filter.direction.as_deref() {
        query = query.filter(listings::Column::Direction.eq(direction));
    }
    if let Some(status) = filter.status {
        query = query.filter(listings::Column::Status.eq(status.to_string()));
    }
    if let Some(is_featured) = filter.is_featured {
        query = query.filter(listings::Column::IsFeatured.eq(is_featured));
    }

    if let Some(min) = filter.min_price {
        query = query.filter(listings::Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(listings::Column::Price.lte(max));
    }

    // Either area column may satisfy each bound.
    if let Some(min) = filter.min_area {
        query = query.filter(
            Condition::any()
                .add(listings::Column::AreaLand.gte(min))
                .add(listings::Column::AreaFloor.gte(min)),
        );
    }
    if let Some(max) = filter.max_area {
        query = query.filter(
            Condition::any()
                .add(listings::Column::AreaLand.lte(max))
                .add(listings::Column::AreaFloor.lte(max)),
        );
    }

    if let Some(needle) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.contains_any_ignore_case(
            &[
                listings::Column::Title,
                listings::Column::Description,
                listings::Column::Address,
            ],
            needle,
        );
    }

    query
}

/// [`filtered`] plus ordering. Featured searches put the longest-running
/// promotion first among equal sort keys.
fn search_query(filter: &ListingFilter) -> Select<listings::Entity> {
    let order = match filter.sort_order {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    };
    let query = filtered(filter).order_by(sort_column(filter.sort_by), order);
    if filter.is_featured == Some(true) {
        query.order_by_desc(listings::Column::FeaturedUntil)
    } else {
        query
    }
}

fn sort_column(field: ListingSortField) -> listings::Column {
    match field {
        ListingSortField::CreatedAt => listings::Column::CreatedAt,
        ListingSortField::Price => listings::Column::Price,
        ListingSortField::Views => listings::Column::Views,
        ListingSortField::QualityScore => listings::Column::QualityScore,
        ListingSortField::PublishedAt => listings::Column::PublishedAt,
    }
}

fn string_list(value: serde_json::Value) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

fn active_model(listing: &Listing) -> listings::ActiveModel {
    listings::ActiveModel {
        id: Set(listing.id),
        code: Set(listing.code.clone()),
        user_id: Set(listing.user_id),
        transaction_type: Set(listing.transaction_type.to_string()),
        property_type_id: Set(listing.property_type_id),
        title: Set(listing.title.clone()),
        description: Set(listing.description.clone()),
        highlights: Set(serde_json::json!(listing.highlights)),
        admin_unit_code: Set(listing.admin_unit_code.clone()),
        address: Set(listing.address.clone()),
        street: Set(listing.street.clone()),
        latitude: Set(listing.latitude),
        longitude: Set(listing.longitude),
        area_land: Set(listing.area_land),
        area_floor: Set(listing.area_floor),
        frontage: Set(listing.frontage),
        floors: Set(listing.floors),
        bedrooms: Set(listing.bedrooms),
        bathrooms: Set(listing.bathrooms),
        direction: Set(listing.direction.clone()),
        price: Set(listing.price),
        price_unit: Set(listing.price_unit.clone()),
        price_negotiable: Set(listing.price_negotiable),
        legal_status: Set(listing.legal_status.clone()),
        ownership_type: Set(listing.ownership_type.clone()),
        is_mortgaged: Set(listing.is_mortgaged),
        amenities: Set(serde_json::json!(listing.amenities)),
        furniture: Set(listing.furniture.clone()),
        status: Set(listing.status.to_string()),
        is_featured: Set(listing.is_featured),
        featured_until: Set(listing.featured_until),
        slug: Set(listing.slug.clone()),
        views: Set(listing.views),
        saves: Set(listing.saves),
        contacts: Set(listing.contacts),
        quality_score: Set(listing.quality_score),
        expires_at: Set(listing.expires_at),
        published_at: Set(listing.published_at),
        created_at: Set(listing.created_at),
        updated_at: Set(listing.updated_at),
    }
}

fn listing_from_model(model: listings::Model) -> Listing {
    let status = model.status.parse().unwrap_or_else(|_| {
        tracing::warn!(listing_id = %model.id, status = %model.status, "unknown listing status");
        ListingStatus::Draft
    });
    let transaction_type = model.transaction_type.parse().unwrap_or_else(|_| {
        tracing::warn!(
            listing_id = %model.id,
            transaction_type = %model.transaction_type,
            "unknown transaction type"
        );
        TransactionType::Sell
    });
    Listing {
        id: model.id,
        code: model.code,
        user_id: model.user_id,
        transaction_type,
        property_type_id: model.property_type_id,
        title: model.title,
        description: model.description,
        highlights: string_list(model.highlights),
        admin_unit_code: model.admin_unit_code,
        address: model.address,
        street: model.street,
        latitude: model.latitude,
        longitude: model.longitude,
        area_land: model.area_land,
        area_floor: model.area_floor,
        frontage: model.frontage,
        floors: model.floors,
        bedrooms: model.bedrooms,
        bathrooms: model.bathrooms,
        direction: model.direction,
        price: model.price,
        price_unit: model.price_unit,
        price_negotiable: model.price_negotiable,
        legal_status: model.legal_status,
        ownership_type: model.ownership_type,
        is_mortgaged: model.is_mortgaged,
        amenities: string_list(model.amenities),
        furniture: model.furniture,
        status,
        is_featured: model.is_featured,
        featured_until: model.featured_until,
        slug: model.slug,
        views: model.views,
        saves: model.saves,
        contacts: model.contacts,
        quality_score: model.quality_score,
        expires_at: model.expires_at,
        published_at: model.published_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
