#![allow(async_fn_in_trait)]

use chrono::NaiveDate;
use uuid::Uuid;

use nhadat_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Counter, Listing, ListingFilter};
use crate::error::ListingsServiceError;

pub trait ListingRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, ListingsServiceError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Listing>, ListingsServiceError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Listing>, ListingsServiceError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, ListingsServiceError>;

    /// Atomically take the next code sequence number (starting at 1) for
    /// `admin_unit_code` on `day`.
    async fn next_code_sequence(
        &self,
        admin_unit_code: &str,
        day: NaiveDate,
    ) -> Result<u32, ListingsServiceError>;

    async fn create(&self, listing: &Listing) -> Result<(), ListingsServiceError>;

    /// Overwrite every mutable column of an existing listing.
    async fn save(&self, listing: &Listing) -> Result<(), ListingsServiceError>;

    async fn delete(&self, id: Uuid) -> Result<(), ListingsServiceError>;

    /// Add one to `counter`. Returns `false` when no listing has this id.
    async fn increment(&self, id: Uuid, counter: Counter) -> Result<bool, ListingsServiceError>;

    async fn search(
        &self,
        filter: &ListingFilter,
        page: PageRequest,
    ) -> Result<Page<Listing>, ListingsServiceError>;

    /// All listings of `user_id`, newest first.
    async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<Listing>, ListingsServiceError>;
}
