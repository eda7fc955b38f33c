use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LibraryEntries::Table)
                    .if_not_exists()
                    .col(uuid(LibraryEntries::UserId))
                    .col(string(LibraryEntries::ItemId))
                    .col(string(LibraryEntries::SourceId))
                    .col(timestamp_with_time_zone(LibraryEntries::Datetime))
                    .col(big_integer(LibraryEntries::Updates))
                    .col(string_null(LibraryEntries::LatestChapter))
                    .primary_key(
                        Index::create()
                            .col(LibraryEntries::UserId)
                            .col(LibraryEntries::ItemId)
                            .col(LibraryEntries::SourceId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_library_entries_user_datetime")
                    .table(LibraryEntries::Table)
                    .col(LibraryEntries::UserId)
                    .col(LibraryEntries::Datetime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LibraryEntries::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum LibraryEntries {
    Table,
    UserId,
    ItemId,
    SourceId,
    Datetime,
    Updates,
    LatestChapter,
}
