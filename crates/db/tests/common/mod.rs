//! Shared setup for repository integration tests.

#![allow(dead_code)]

use kakeibo_db::{UserRepository, connect, entities::users, run_migrations};
use kakeibo_shared::config::DatabaseConfig;
use sea_orm::DatabaseConnection;

/// Opens a fresh in-memory SQLite database with the schema applied.
///
/// Every in-memory connection is its own database, so the pool is pinned to
/// a single connection.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = connect("sqlite::memory:", &config)
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&db).await.expect("Failed to run migrations");
    db
}

/// Inserts a user with a placeholder hash.
pub async fn create_user(db: &DatabaseConnection, email: &str) -> users::Model {
    UserRepository::new(db.clone())
        .create(email, "$argon2id$placeholder")
        .await
        .expect("Failed to create test user")
}

/// Parses a `YYYY-MM` literal.
pub fn month(s: &str) -> kakeibo_shared::types::YearMonth {
    s.parse().expect("valid month literal")
}
