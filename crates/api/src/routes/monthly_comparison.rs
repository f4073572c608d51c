//! Month-by-month comparison of payments and balances.

use axum::{Json, Router, extract::State, routing::get};
use kakeibo_core::monthly::ComparisonRow;
use kakeibo_db::MonthlyRepository;
use serde::Serialize;

use crate::{ApiResult, AppState, middleware::AuthUser};

/// Creates the comparison route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/monthly-comparison", get(page))
}

/// Page data.
#[derive(Debug, Serialize)]
pub struct ComparisonPage {
    /// One row per month, newest first.
    pub records: Vec<ComparisonRow>,
}

/// GET /monthly-comparison - Page load.
async fn page(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ComparisonPage>> {
    let records = match state.db {
        Some(db) => MonthlyRepository::new(db).comparison(auth.id()).await?,
        None => Vec::new(),
    };
    Ok(Json(ComparisonPage { records }))
}
