//! SeaORM storage backend
//!
//! SQLite, MySQL/MariaDB and PostgreSQL behind one `SeaOrmStorage`.

mod connection;
mod converters;
mod member;
pub mod retry;
mod study;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{ModoosError, Result};
use crate::storage::models::Category;

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_member, model_to_study};
pub use study::sort_column;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(ModoosError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 招募帖过滤条件
#[derive(Default, Clone, Debug)]
pub struct StudyFilter {
    /// 标题子串；全空白视为未设置
    pub title: Option<String>,
    /// 为空时不过滤
    pub categories: Vec<Category>,
    /// 游标：只返回 id < last_id
    pub last_id: Option<i64>,
}

impl StudyFilter {
    /// 原样返回（首尾空白也参与匹配），全空白时为 None
    pub fn effective_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(ModoosError::database_config("database_url 未设置"));
        }

        let backend_name = infer_backend_from_url(&config.database_url)?;
        let db = if backend_name == "sqlite" {
            connect_sqlite(config).await?
        } else {
            connect_generic(config, &backend_name).await?
        };

        run_migrations(&db).await?;

        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(Self {
            db,
            backend_name,
            retry_config: retry::RetryConfig::from(config),
        })
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 健康检查用
    pub async fn ping(&self) -> Result<()> {
        self.db
            .execute_unprepared("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| ModoosError::database_connection(e.to_string()))
    }
}
