use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Per-student topic completion, separate from the syllabus flag
        manager
            .create_table(
                Table::create()
                    .table(TopicProgress::Table)
                    .if_not_exists()
                    .col(pk_auto(TopicProgress::Id))
                    .col(integer(TopicProgress::TopicId))
                    .col(integer(TopicProgress::StudentId))
                    .col(boolean(TopicProgress::IsCompleted).default(false))
                    .col(timestamp_with_time_zone_null(TopicProgress::CompletedAt))
                    .col(string_null(TopicProgress::Notes))
                    .col(timestamp_with_time_zone(TopicProgress::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_progress_topic")
                            .from(TopicProgress::Table, TopicProgress::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_topic_progress_student")
                            .from(TopicProgress::Table, TopicProgress::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_topic_progress_topic_student")
                    .table(TopicProgress::Table)
                    .col(TopicProgress::TopicId)
                    .col(TopicProgress::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Study material attached to topics
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(pk_auto(Resources::Id))
                    .col(integer(Resources::TopicId))
                    .col(string(Resources::Title))
                    .col(string_null(Resources::ResourceType))
                    .col(string_null(Resources::Url))
                    .col(string_null(Resources::Description))
                    .col(integer_null(Resources::UploadedBy))
                    .col(timestamp_with_time_zone(Resources::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_topic")
                            .from(Resources::Table, Resources::TopicId)
                            .to(Topics::Table, Topics::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_resource_uploader")
                            .from(Resources::Table, Resources::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TopicProgress::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum TopicProgress {
    Table,
    Id,
    TopicId,
    StudentId,
    IsCompleted,
    CompletedAt,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Resources {
    Table,
    Id,
    TopicId,
    Title,
    ResourceType,
    Url,
    Description,
    UploadedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Topics {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
