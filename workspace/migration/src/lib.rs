pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_core_tables;
mod m20250315_000001_add_progress_tracking;
mod m20250402_000001_add_activity_feed;
mod m20250420_000001_add_report_cache;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_core_tables::Migration),
            Box::new(m20250315_000001_add_progress_tracking::Migration),
            Box::new(m20250402_000001_add_activity_feed::Migration),
            Box::new(m20250420_000001_add_report_cache::Migration),
        ]
    }
}
