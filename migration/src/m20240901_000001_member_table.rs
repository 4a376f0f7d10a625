use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Member::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Member::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Member::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Member::Password).string_len(255).not_null())
                    .col(ColumnDef::new(Member::Nickname).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Member::Role)
                            .string_len(32)
                            .not_null()
                            .default("ROLE_USER"),
                    )
                    .col(
                        ColumnDef::new(Member::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 邮箱即登录名，必须唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uk_member_email")
                    .table(Member::Table)
                    .col(Member::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uk_member_email")
                    .table(Member::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Member::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Member {
    #[sea_orm(iden = "members")]
    Table,
    Id,
    Email,
    Password,
    Nickname,
    Role,
    CreatedAt,
}
