use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProgressRecords::Table)
                    .if_not_exists()
                    .col(uuid(ProgressRecords::UserId))
                    .col(string(ProgressRecords::ItemId))
                    .col(string(ProgressRecords::SourceId))
                    .col(timestamp_with_time_zone(ProgressRecords::Datetime))
                    .col(string_null(ProgressRecords::ChapterId))
                    .col(string_null(ProgressRecords::ChapterTitle))
                    .col(big_integer(ProgressRecords::Page))
                    .primary_key(
                        Index::create()
                            .col(ProgressRecords::UserId)
                            .col(ProgressRecords::ItemId)
                            .col(ProgressRecords::SourceId),
                    )
                    .to_owned(),
            )
            .await?;

        // Newest-first listing per user
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_progress_records_user_datetime")
                    .table(ProgressRecords::Table)
                    .col(ProgressRecords::UserId)
                    .col(ProgressRecords::Datetime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProgressRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProgressRecords {
    Table,
    UserId,
    ItemId,
    SourceId,
    Datetime,
    ChapterId,
    ChapterTitle,
    Page,
}
