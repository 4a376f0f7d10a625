pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20240901_000001_member_table;
mod m20240901_000002_study_table;
mod m20240915_000001_study_search_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_member_table::Migration),
            Box::new(m20240901_000002_study_table::Migration),
            Box::new(m20240915_000001_study_search_index::Migration),
        ]
    }
}
