//! Route definitions.
//!
//! The router is split into trees by guard:
//! - protected: monthly income, comparison, reports and assets
//! - member (`/user`): asset comparison and document pages
//! - public-only: landing and login pages
//! - unguarded: health, login/logout actions and the document API, which
//!   checks identity per handler

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{public_only, require_login, require_member},
};

pub mod assets_comparison;
pub mod auth;
pub mod documents;
pub mod health;
pub mod monthly_assets;
pub mod monthly_comparison;
pub mod monthly_income;
pub mod reports;

/// Creates all routes with their guards applied.
pub fn app_routes() -> Router<AppState> {
    let protected = Router::new()
        .merge(monthly_income::routes())
        .merge(monthly_comparison::routes())
        .merge(reports::routes())
        .merge(monthly_assets::routes())
        .layer(middleware::from_fn(require_login));

    let member = Router::new()
        .merge(assets_comparison::routes())
        .merge(documents::page_routes())
        .layer(middleware::from_fn(require_member));

    let public = Router::new()
        .merge(auth::public_routes())
        .layer(middleware::from_fn(public_only));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(documents::api_routes())
        .merge(protected)
        .merge(member)
        .merge(public)
}
