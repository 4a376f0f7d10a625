use sea_orm_migration::prelude::*;

use super::m20240901_000001_member_table::Member;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Study::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Study::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Study::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Study::Description).text().not_null())
                    .col(ColumnDef::new(Study::Category).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Study::Status)
                            .string_len(16)
                            .not_null()
                            .default("RECRUITING"),
                    )
                    .col(ColumnDef::new(Study::WriterId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Study::Participants)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Study::TotalParticipants)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Study::ViewCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Study::LikeCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Study::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_study_writer")
                            .from(Study::Table, Study::WriterId)
                            .to(Member::Table, Member::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分类过滤
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_study_category")
                    .table(Study::Table)
                    .col(Study::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_study_created_at")
                    .table(Study::Table)
                    .col(Study::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_study_created_at")
                    .table(Study::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_study_category")
                    .table(Study::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Study::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Study {
    #[sea_orm(iden = "studies")]
    Table,
    Id,
    Title,
    Description,
    Category,
    Status,
    WriterId,
    Participants,
    TotalParticipants,
    ViewCount,
    LikeCount,
    CreatedAt,
}
