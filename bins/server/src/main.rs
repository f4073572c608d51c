//! Kakeibo API Server
//!
//! Main entry point for the Kakeibo household ledger service.

use anyhow::Context;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kakeibo_api::{AppState, create_router};
use kakeibo_db::{SessionRepository, connect, run_migrations};
use kakeibo_shared::{AppConfig, config::DatabaseConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kakeibo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = open_store(&config.database).await?;
    let state = AppState::new(db, &config.session);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects, migrates and prunes expired sessions. `None` without a URL.
async fn open_store(config: &DatabaseConfig) -> anyhow::Result<Option<DatabaseConnection>> {
    let Some(url) = config.url.as_deref() else {
        warn!("No database URL configured; running without a data store");
        return Ok(None);
    };

    let db = connect(url, config)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    if config.run_migrations {
        run_migrations(&db).await.context("Failed to run migrations")?;
    }

    let pruned = SessionRepository::new(db.clone())
        .delete_expired(Utc::now())
        .await?;
    info!(pruned, "Expired sessions removed");

    Ok(Some(db))
}
