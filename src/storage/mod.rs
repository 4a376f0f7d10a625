use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;
pub mod pagination;

pub use backend::{SeaOrmStorage, StudyFilter};
pub use models::{Category, DEFAULT_ROLE, Member, NewMember, NewStudy, RecruitStatus, Study};
pub use pagination::{Direction, Pageable, Slice, SortOrder};

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::connect(config).await?;
        Ok(Arc::new(storage))
    }
}
