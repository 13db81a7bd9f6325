use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use nhadat_domain::listing::ListingStatus;
use nhadat_domain::pagination::{Page, PageRequest};

use crate::domain::code::format_listing_code;
use crate::domain::quality;
use crate::domain::repository::ListingRepository;
use crate::domain::slug::{slugify, with_suffix};
use crate::domain::types::{
    Counter, DEFAULT_PRICE_UNIT, Listing, ListingFilter, ListingPatch, NewListing,
    PUBLISH_MIN_SCORE, QualityInfo,
};
use crate::error::ListingsServiceError;

/// Slug for `title` that no stored listing uses yet.
async fn unique_slug<R: ListingRepository>(
    repo: &R,
    title: &str,
) -> Result<String, ListingsServiceError> {
    let base = slugify(title);
    let mut candidate = base.clone();
    let mut n = 1;
    while repo.slug_exists(&candidate).await? {
        candidate = with_suffix(&base, n);
        n += 1;
    }
    Ok(candidate)
}

/// Writes tried before a slug race surfaces as [`ListingsServiceError::SlugTaken`].
const SLUG_WRITE_ATTEMPTS: u32 = 3;

/// Insert or update `listing`, taking a fresh slug whenever a concurrent
/// writer claimed the current one between the existence check and the write.
async fn write_with_fresh_slug<R: ListingRepository>(
    repo: &R,
    listing: &mut Listing,
    insert: bool,
) -> Result<(), ListingsServiceError> {
    let mut attempt = 1;
    loop {
        let result = if insert {
            repo.create(listing).await
        } else {
            repo.save(listing).await
        };
        match result {
            Err(ListingsServiceError::SlugTaken) if attempt < SLUG_WRITE_ATTEMPTS => {
                warn!(slug = %listing.slug, attempt, "listing slug taken concurrently");
                listing.slug = unique_slug(repo, &listing.title).await?;
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Load a listing the caller must own. `forbidden` is the message for non-owners.
async fn load_owned<R: ListingRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
    forbidden: &'static str,
) -> Result<Listing, ListingsServiceError> {
    let listing = repo
        .find_by_id(id)
        .await?
        .ok_or(ListingsServiceError::ListingNotFound)?;
    if !listing.is_owned_by(user_id) {
        return Err(ListingsServiceError::Forbidden(forbidden));
    }
    Ok(listing)
}

// ── CreateListing ────────────────────────────────────────────────────────────

pub struct CreateListingUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> CreateListingUseCase<R> {
    /// Store a new draft owned by `user_id` with a fresh code, slug and score.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: NewListing,
    ) -> Result<Listing, ListingsServiceError> {
        let now = Utc::now();
        let sequence = self
            .repo
            .next_code_sequence(&input.admin_unit_code, now.date_naive())
            .await?;
        let code = format_listing_code(&input.admin_unit_code, now.date_naive(), sequence);
        let slug = unique_slug(&self.repo, &input.title).await?;

        let mut listing = Listing {
            id: Uuid::now_v7(),
            code,
            user_id,
            transaction_type: input.transaction_type,
            property_type_id: input.property_type_id,
            title: input.title,
            description: input.description,
            highlights: input.highlights,
            admin_unit_code: input.admin_unit_code,
            address: input.address,
            street: input.street,
            latitude: input.latitude,
            longitude: input.longitude,
            area_land: input.area_land,
            area_floor: input.area_floor,
            frontage: input.frontage,
            floors: input.floors,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            direction: input.direction,
            price: input.price,
            price_unit: input
                .price_unit
                .unwrap_or_else(|| DEFAULT_PRICE_UNIT.to_owned()),
            price_negotiable: input.price_negotiable,
            legal_status: input.legal_status,
            ownership_type: input.ownership_type,
            is_mortgaged: input.is_mortgaged,
            amenities: input.amenities,
            furniture: input.furniture,
            status: ListingStatus::Draft,
            is_featured: false,
            featured_until: None,
            slug,
            views: 0,
            saves: 0,
            contacts: 0,
            quality_score: 0.0,
            expires_at: None,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        listing.quality_score = quality::calculate_score(&listing);

        write_with_fresh_slug(&self.repo, &mut listing, true).await?;
        info!(
            listing_id = %listing.id,
            code = %listing.code,
            quality_score = listing.quality_score,
            "listing created"
        );
        Ok(listing)
    }
}

// ── GetListing ───────────────────────────────────────────────────────────────

pub struct GetListingUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> GetListingUseCase<R> {
    /// Counts a view unless `viewer` owns the listing.
    pub async fn execute(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Listing, ListingsServiceError> {
        let mut listing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ListingsServiceError::ListingNotFound)?;

        if viewer != Some(listing.user_id) && self.repo.increment(id, Counter::Views).await? {
            listing.views += 1;
        }
        Ok(listing)
    }
}

pub struct GetListingByCodeUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> GetListingByCodeUseCase<R> {
    pub async fn execute(&self, code: &str) -> Result<Listing, ListingsServiceError> {
        self.repo
            .find_by_code(code)
            .await?
            .ok_or(ListingsServiceError::ListingNotFound)
    }
}

pub struct GetListingBySlugUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> GetListingBySlugUseCase<R> {
    pub async fn execute(&self, slug: &str) -> Result<Listing, ListingsServiceError> {
        self.repo
            .find_by_slug(slug)
            .await?
            .ok_or(ListingsServiceError::ListingNotFound)
    }
}

// ── SearchListings ───────────────────────────────────────────────────────────

pub struct SearchListingsUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> SearchListingsUseCase<R> {
    pub async fn execute(
        &self,
        filter: ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, ListingsServiceError> {
        self.repo.search(&filter, page.clamped()).await
    }
}

pub struct ListMyListingsUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> ListMyListingsUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Listing>, ListingsServiceError> {
        self.repo.list_by_owner(user_id).await
    }
}

// ── UpdateListing ────────────────────────────────────────────────────────────

pub struct UpdateListingUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> UpdateListingUseCase<R> {
    /// Merge `patch` into the owner's listing. A new title gets a new slug.
    pub async fn execute(
        &self,
        id: Uuid,
        user_id: Uuid,
        patch: ListingPatch,
    ) -> Result<Listing, ListingsServiceError> {
        let mut listing = load_owned(
            &self.repo,
            id,
            user_id,
            "You can only update your own listings",
        )
        .await?;

        if let Some(title) = patch.title.as_deref() {
            if title != listing.title {
                listing.slug = unique_slug(&self.repo, title).await?;
            }
        }
        patch.apply_to(&mut listing);
        listing.quality_score = quality::calculate_score(&listing);
        listing.updated_at = Utc::now();

        write_with_fresh_slug(&self.repo, &mut listing, false).await?;
        Ok(listing)
    }
}

// ── DeleteListing ────────────────────────────────────────────────────────────

pub struct DeleteListingUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> DeleteListingUseCase<R> {
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<(), ListingsServiceError> {
        load_owned(
            &self.repo,
            id,
            user_id,
            "You can only delete your own listings",
        )
        .await?;
        self.repo.delete(id).await?;
        info!(listing_id = %id, "listing deleted");
        Ok(())
    }
}

// ── PublishListing ───────────────────────────────────────────────────────────

pub struct PublishListingUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> PublishListingUseCase<R> {
    /// Submit a draft for review (`draft → pending`). The listing is left
    /// untouched when the quality gate fails.
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<Listing, ListingsServiceError> {
        let mut listing = load_owned(
            &self.repo,
            id,
            user_id,
            "You can only publish your own listings",
        )
        .await?;

        if listing.status != ListingStatus::Draft {
            return Err(ListingsServiceError::NotDraft);
        }

        let score = quality::calculate_score(&listing);
        if score < PUBLISH_MIN_SCORE {
            return Err(ListingsServiceError::QualityTooLow {
                score,
                suggestions: quality::suggestions(&listing),
            });
        }

        let now = Utc::now();
        listing.status = ListingStatus::Pending;
        listing.quality_score = score;
        listing.published_at = Some(now);
        listing.updated_at = now;
        self.repo.save(&listing).await?;
        info!(listing_id = %id, quality_score = score, "listing submitted for review");
        Ok(listing)
    }
}

// ── RecordEngagement ─────────────────────────────────────────────────────────

/// Bumps the save or contact counter. Any authenticated user may do this.
pub struct RecordEngagementUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> RecordEngagementUseCase<R> {
    pub async fn execute(&self, id: Uuid, counter: Counter) -> Result<(), ListingsServiceError> {
        if self.repo.increment(id, counter).await? {
            Ok(())
        } else {
            Err(ListingsServiceError::ListingNotFound)
        }
    }
}

// ── GetQualityInfo ───────────────────────────────────────────────────────────

pub struct GetQualityInfoUseCase<R: ListingRepository> {
    pub repo: R,
}

impl<R: ListingRepository> GetQualityInfoUseCase<R> {
    pub async fn execute(&self, id: Uuid, user_id: Uuid) -> Result<QualityInfo, ListingsServiceError> {
        let listing = load_owned(
            &self.repo,
            id,
            user_id,
            "You can only view quality info for your own listings",
        )
        .await?;
        Ok(quality::quality_info(&listing))
    }
}
