//! Asset comparison across snapshots.

use axum::{Json, Router, extract::State, routing::get};
use kakeibo_core::assets::AssetComparisonRow;
use kakeibo_db::AssetRepository;
use serde::Serialize;

use crate::{ApiResult, AppState, middleware::AuthUser};

/// Creates the asset comparison route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/user/assets-comparison", get(page))
}

/// Page data.
#[derive(Debug, Serialize)]
pub struct AssetsComparisonPage {
    /// Category totals with change against the previous snapshot, oldest
    /// first.
    pub monthly_assets: Vec<AssetComparisonRow>,
}

/// GET /user/assets-comparison - Page load.
async fn page(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AssetsComparisonPage>> {
    let monthly_assets = match state.db {
        Some(db) => AssetRepository::new(db).comparison(auth.id()).await?,
        None => Vec::new(),
    };
    Ok(Json(AssetsComparisonPage { monthly_assets }))
}
