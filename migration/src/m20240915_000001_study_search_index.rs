use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        match manager.get_database_backend() {
            DatabaseBackend::Postgres => {
                // 标题模糊搜索 LIKE '%keyword%' 依赖 pg_trgm
                conn.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
                    .await?;
                conn.execute_unprepared(
                    "CREATE INDEX IF NOT EXISTS idx_study_title_trgm ON studies USING GIN (title gin_trgm_ops)",
                )
                .await?;
            }
            DatabaseBackend::MySql => {
                // FULLTEXT 不支持 IF NOT EXISTS，已存在时忽略错误
                conn.execute_unprepared(
                    "ALTER TABLE studies ADD FULLTEXT INDEX idx_study_title_fulltext (title)",
                )
                .await
                .ok();
                conn.execute_unprepared(
                    "CREATE INDEX idx_study_category_id ON studies (category, id DESC)",
                )
                .await
                .ok();
                return Ok(());
            }
            _ => {}
        }

        // 默认排序 id DESC + 分类过滤
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_study_category_id ON studies (category, id DESC)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        match manager.get_database_backend() {
            DatabaseBackend::Postgres => {
                conn.execute_unprepared("DROP INDEX IF EXISTS idx_study_title_trgm")
                    .await?;
            }
            DatabaseBackend::MySql => {
                conn.execute_unprepared("ALTER TABLE studies DROP INDEX idx_study_title_fulltext")
                    .await
                    .ok();
            }
            _ => {}
        }

        manager
            .drop_index(
                Index::drop()
                    .name("idx_study_category_id")
                    .table(Alias::new("studies"))
                    .to_owned(),
            )
            .await
    }
}
