//! HTTP layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The session gate that resolves the `session` cookie once per request
//! - Route guards for the protected, member and public-only trees
//! - Page-load and action routes for monthly records, assets and documents
//! - Uniform `{ "error": … }` responses

pub mod error;
pub mod form;
pub mod middleware;
pub mod routes;

pub use error::{ApiError, ApiResult};

use axum::{
    Router,
    http::header::{COOKIE, SET_COOKIE},
};
use kakeibo_core::auth::SessionTtl;
use kakeibo_shared::config::SessionConfig;
use sea_orm::DatabaseConnection;
use tower_http::{
    sensitive_headers::{SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection pool; `None` when no store is configured.
    pub db: Option<DatabaseConnection>,
    /// Session lifetimes for newly created sessions.
    pub session_ttl: SessionTtl,
    /// Whether the session cookie carries `Secure`.
    pub secure_cookie: bool,
}

impl AppState {
    /// Builds the state from an optional store and the session settings.
    #[must_use]
    pub fn new(db: Option<DatabaseConnection>, session: &SessionConfig) -> Self {
        Self {
            db,
            session_ttl: SessionTtl {
                standard_days: i64::from(session.standard_ttl_days),
                extended_days: i64::from(session.extended_ttl_days),
            },
            secure_cookie: session.secure_cookie,
        }
    }

    /// The store, for handlers that must write.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` when no store is configured.
    pub fn store(&self) -> ApiResult<&DatabaseConnection> {
        self.db.as_ref().ok_or_else(ApiError::store_unavailable)
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::app_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_gate,
        ))
        .layer(SetSensitiveResponseHeadersLayer::new([SET_COOKIE]))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new([COOKIE]))
        .with_state(state)
}
