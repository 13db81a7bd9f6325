pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_listings;
mod m20250601_000002_create_listing_code_sequences;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_listings::Migration),
            Box::new(m20250601_000002_create_listing_code_sequences::Migration),
        ]
    }
}
