//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and applied at server
//! startup.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_users_sessions;
mod m20250301_000002_monthly;
mod m20250301_000003_assets;
mod m20250301_000004_documents;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_users_sessions::Migration),
            Box::new(m20250301_000002_monthly::Migration),
            Box::new(m20250301_000003_assets::Migration),
            Box::new(m20250301_000004_documents::Migration),
        ]
    }
}
