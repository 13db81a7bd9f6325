use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ListingCodeSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ListingCodeSequences::AdminUnitCode)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ListingCodeSequences::Day).date().not_null())
                    .col(
                        ColumnDef::new(ListingCodeSequences::Value)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ListingCodeSequences::AdminUnitCode)
                            .col(ListingCodeSequences::Day),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ListingCodeSequences::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ListingCodeSequences {
    Table,
    AdminUnitCode,
    Day,
    Value,
}
