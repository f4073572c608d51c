//! Income and asset report.

use axum::{Json, Router, extract::State, routing::get};
use futures::future::try_join;
use kakeibo_core::{assets::CategoryBreakdown, monthly::IncomeReportRow};
use kakeibo_db::{AssetRepository, MonthlyRepository};
use serde::Serialize;

use crate::{ApiResult, AppState, middleware::AuthUser};

/// Creates the report route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/reports", get(page))
}

/// Asset totals of one snapshot.
#[derive(Debug, Serialize)]
pub struct AssetReportRow {
    /// Snapshot month.
    pub record_date: String,
    /// Category totals.
    #[serde(flatten)]
    pub breakdown: CategoryBreakdown,
}

/// Page data. Both series run oldest first.
#[derive(Debug, Default, Serialize)]
pub struct ReportsPage {
    /// Income, burden and disposable balance per month.
    pub income_data: Vec<IncomeReportRow>,
    /// Asset totals per snapshot.
    pub asset_data: Vec<AssetReportRow>,
}

/// GET /reports - Page load.
async fn page(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<ReportsPage>> {
    let Some(db) = state.db else {
        return Ok(Json(ReportsPage::default()));
    };

    let monthly = MonthlyRepository::new(db.clone());
    let assets = AssetRepository::new(db);
    let (income_data, breakdowns) =
        try_join(monthly.income_report(auth.id()), assets.breakdowns(auth.id())).await?;

    Ok(Json(ReportsPage {
        income_data,
        asset_data: breakdowns
            .into_iter()
            .map(|(record_date, breakdown)| AssetReportRow {
                record_date,
                breakdown,
            })
            .collect(),
    }))
}
