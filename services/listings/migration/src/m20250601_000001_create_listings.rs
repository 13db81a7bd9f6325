use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Listings::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Listings::Code)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Listings::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Listings::TransactionType)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::PropertyTypeId).uuid())
                    .col(ColumnDef::new(Listings::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Listings::Description).text())
                    .col(
                        ColumnDef::new(Listings::Highlights)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Listings::AdminUnitCode)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::Address).text().not_null())
                    .col(ColumnDef::new(Listings::Street).string_len(200))
                    .col(ColumnDef::new(Listings::Latitude).double())
                    .col(ColumnDef::new(Listings::Longitude).double())
                    .col(ColumnDef::new(Listings::AreaLand).double())
                    .col(ColumnDef::new(Listings::AreaFloor).double())
                    .col(ColumnDef::new(Listings::Frontage).double())
                    .col(ColumnDef::new(Listings::Floors).integer())
                    .col(ColumnDef::new(Listings::Bedrooms).integer())
                    .col(ColumnDef::new(Listings::Bathrooms).integer())
                    .col(ColumnDef::new(Listings::Direction).string_len(20))
                    .col(ColumnDef::new(Listings::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Listings::PriceUnit)
                            .string_len(20)
                            .not_null()
                            .default("total"),
                    )
                    .col(
                        ColumnDef::new(Listings::PriceNegotiable)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::LegalStatus).string_len(30))
                    .col(ColumnDef::new(Listings::OwnershipType).string_len(30))
                    .col(
                        ColumnDef::new(Listings::IsMortgaged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Listings::Amenities)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Listings::Furniture).string_len(30))
                    .col(
                        ColumnDef::new(Listings::Status)
                            .string_len(20)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Listings::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Listings::FeaturedUntil).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Listings::Slug)
                            .string_len(300)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Listings::Views)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Listings::Saves)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Listings::Contacts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Listings::QualityScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Listings::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Listings::PublishedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Listings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Listings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::UserId)
                    .name("idx_listings_user")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::Status)
                    .name("idx_listings_status")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::TransactionType)
                    .col(Listings::PropertyTypeId)
                    .name("idx_listings_type")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::AdminUnitCode)
                    .name("idx_listings_location")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::Price)
                    .name("idx_listings_price")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Listings::Table)
                    .col(Listings::IsFeatured)
                    .col(Listings::FeaturedUntil)
                    .name("idx_listings_featured")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    Code,
    UserId,
    TransactionType,
    PropertyTypeId,
    Title,
    Description,
    Highlights,
    AdminUnitCode,
    Address,
    Street,
    Latitude,
    Longitude,
    AreaLand,
    AreaFloor,
    Frontage,
    Floors,
    Bedrooms,
    Bathrooms,
    Direction,
    Price,
    PriceUnit,
    PriceNegotiable,
    LegalStatus,
    OwnershipType,
    IsMortgaged,
    Amenities,
    Furniture,
    Status,
    IsFeatured,
    FeaturedUntil,
    Slug,
    Views,
    Saves,
    Contacts,
    QualityScore,
    ExpiresAt,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}
