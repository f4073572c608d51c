//! Liveness probe. Answers without a session and without a store.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Creates the `/health` route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Crate version of the running build.
    pub version: &'static str,
    /// Whether a data store is configured.
    pub store: bool,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store: state.db.is_some(),
    })
}
