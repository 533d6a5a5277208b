use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReportCache::Table)
                    .if_not_exists()
                    .col(pk_auto(ReportCache::Id))
                    .col(string(ReportCache::ReportType))
                    .col(json_null(ReportCache::Filters))
                    .col(json(ReportCache::Data))
                    .col(timestamp_with_time_zone(ReportCache::GeneratedAt))
                    .col(timestamp_with_time_zone_null(ReportCache::ExpiresAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_report_cache_type")
                    .table(ReportCache::Table)
                    .col(ReportCache::ReportType)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReportCache::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ReportCache {
    Table,
    Id,
    ReportType,
    Filters,
    Data,
    GeneratedAt,
    ExpiresAt,
}
