use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use nhadat_domain::listing::{ListingStatus, TransactionType};
use nhadat_domain::pagination::{Page, PageRequest};
use nhadat_listings::domain::repository::ListingRepository;
use nhadat_listings::domain::types::{Counter, Listing, ListingFilter, NewListing};
use nhadat_listings::error::ListingsServiceError;

// ── MockListingRepo ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockListingRepo {
    pub listings: Arc<Mutex<Vec<Listing>>>,
    pub sequences: Arc<Mutex<HashMap<(String, NaiveDate), u32>>>,
    /// Filters received by `search`, newest last. Filtering itself is SQL-side.
    pub searches: Arc<Mutex<Vec<ListingFilter>>>,
    /// Slugs a concurrent writer is about to store: invisible to `slug_exists`
    /// until the next `create`/`save` using one of them collides.
    pub racing_slugs: Arc<Mutex<Vec<String>>>,
    /// Slugs stored by that other writer once it won.
    pub foreign_slugs: Arc<Mutex<Vec<String>>>,
}

impl MockListingRepo {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings: Arc::new(Mutex::new(listings)),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a shared handle to the internal listing list for post-execution inspection.
    pub fn listings_handle(&self) -> Arc<Mutex<Vec<Listing>>> {
        Arc::clone(&self.listings)
    }

    /// Simulate another request inserting `slug` between check and insert.
    pub fn race_on_slug(&self, slug: &str) {
        self.racing_slugs.lock().unwrap().push(slug.to_owned());
    }

    fn claim_racing_slug(&self, slug: &str) -> Result<(), ListingsServiceError> {
        let mut racing = self.racing_slugs.lock().unwrap();
        if let Some(pos) = racing.iter().position(|s| s == slug) {
            let won = racing.remove(pos);
            self.foreign_slugs.lock().unwrap().push(won);
            return Err(ListingsServiceError::SlugTaken);
        }
        Ok(())
    }

    pub fn stored(&self, id: Uuid) -> Option<Listing> {
        self.listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }
}

impl ListingRepository for MockListingRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingsServiceError> {
        Ok(self.stored(id))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Listing>, ListingsServiceError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.code == code)
            .cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingsServiceError> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, ListingsServiceError> {
        let stored = self.listings.lock().unwrap().iter().any(|l| l.slug == slug);
        Ok(stored || self.foreign_slugs.lock().unwrap().iter().any(|s| s == slug))
    }

    async fn next_code_sequence(
        &self,
        admin_unit_code: &str,
        day: NaiveDate,
    ) -> Result<u32, ListingsServiceError> {
        let mut sequences = self.sequences.lock().unwrap();
        let value = sequences
            .entry((admin_unit_code.to_owned(), day))
            .or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn create(&self, listing: &Listing) -> Result<(), ListingsServiceError> {
        self.claim_racing_slug(&listing.slug)?;
        self.listings.lock().unwrap().push(listing.clone());
        Ok(())
    }

    async fn save(&self, listing: &Listing) -> Result<(), ListingsServiceError> {
        self.claim_racing_slug(&listing.slug)?;
        let mut listings = self.listings.lock().unwrap();
        if let Some(existing) = listings.iter_mut().find(|l| l.id == listing.id) {
            *existing = listing.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ListingsServiceError> {
        self.listings.lock().unwrap().retain(|l| l.id != id);
        Ok(())
    }

    async fn increment(&self, id: Uuid, counter: Counter) -> Result<bool, ListingsServiceError> {
        let mut listings = self.listings.lock().unwrap();
        let Some(listing) = listings.iter_mut().find(|l| l.id == id) else {
            return Ok(false);
        };
        match counter {
            Counter::Views => listing.views += 1,
            Counter::Saves => listing.saves += 1,
            Counter::Contacts => listing.contacts += 1,
        }
        Ok(true)
    }

    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, ListingsServiceError> {
        self.searches.lock().unwrap().push(filter.clone());
        let hits = self.listings.lock().unwrap().clone();
        let total = hits.len() as u64;
        let data = hits
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok(Page {
            data,
            total,
            page: page.page,
            limit: page.limit,
        })
    }

    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, ListingsServiceError> {
        let mut owned: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

pub fn owner_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
}

pub fn stranger_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Bare-minimum input: scores 1.0 (price + location).
pub fn sparse_input(title: &str) -> NewListing {
    NewListing {
        title: title.to_owned(),
        admin_unit_code: "79".to_owned(),
        address: "12 Nguyen Hue, District 1".to_owned(),
        price: 3_500_000_000,
        ..NewListing::default()
    }
}

/// Fully described input: scores 10.0.
pub fn complete_input() -> NewListing {
    NewListing {
        transaction_type: TransactionType::Sell,
        title: "Beautiful house in District 1 with great view and modern amenities".to_owned(),
        description: Some(
            "Spacious four-storey townhouse on a quiet street, walking distance to schools, \
             markets and the riverside park. Recently renovated."
                .to_owned(),
        ),
        admin_unit_code: "79".to_owned(),
        address: "12 Nguyen Hue, District 1".to_owned(),
        area_land: Some(80.0),
        area_floor: Some(240.0),
        frontage: Some(5.0),
        floors: Some(4),
        bedrooms: Some(3),
        bathrooms: Some(2),
        direction: Some("East".to_owned()),
        price: 12_000_000_000,
        legal_status: Some("pink_book".to_owned()),
        ownership_type: Some("individual".to_owned()),
        highlights: strings(&["Corner lot", "Near school", "Quiet street"]),
        amenities: strings(&["Parking", "Balcony", "Garden"]),
        ..NewListing::default()
    }
}

/// A stored listing with explicit fields, for search and lifecycle tests.
pub fn stored_listing(user_id: Uuid, title: &str, slug: &str) -> Listing {
    let now = Utc::now();
    Listing {
        id: Uuid::new_v4(),
        code: format!("BDS-HCM-250101{:05}", rand_suffix(slug)),
        user_id,
        transaction_type: TransactionType::Sell,
        property_type_id: None,
        title: title.to_owned(),
        description: None,
        highlights: vec![],
        admin_unit_code: "79".to_owned(),
        address: "12 Nguyen Hue, District 1".to_owned(),
        street: None,
        latitude: None,
        longitude: None,
        area_land: None,
        area_floor: None,
        frontage: None,
        floors: None,
        bedrooms: None,
        bathrooms: None,
        direction: None,
        price: 1_000_000_000,
        price_unit: "total".to_owned(),
        price_negotiable: false,
        legal_status: None,
        ownership_type: None,
        is_mortgaged: false,
        amenities: vec![],
        furniture: None,
        status: ListingStatus::Draft,
        is_featured: false,
        featured_until: None,
        slug: slug.to_owned(),
        views: 0,
        saves: 0,
        contacts: 0,
        quality_score: 1.0,
        expires_at: None,
        published_at: None,
        created_at: now,
        updated_at: now,
    }
}

// Stable per-slug number so fixture codes stay unique.
fn rand_suffix(slug: &str) -> u32 {
    slug.bytes().fold(0u32, |acc, b| (acc * 31 + u32::from(b)) % 100_000)
}
