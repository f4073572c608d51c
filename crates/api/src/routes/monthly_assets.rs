//! Monthly asset snapshots: page load and actions.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
};
use futures::future::try_join;
use kakeibo_core::{
    assets::{
        AssetCategory, CryptoUpdate, GoldUpdate, ItemAmountUpdate, NewAssetItem,
        NewCryptoHolding, NewGoldHolding, previous_record,
    },
    input::{lenient_decimal, lenient_int, lenient_jpy_rate, non_blank},
};
use kakeibo_db::{
    AssetRepository,
    entities::asset_records,
    repositories::asset::{ExistingNames, RecordLines},
};
use kakeibo_shared::types::YearMonth;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    ApiError, ApiResult, AppState,
    form::{Success, optional_id, required_id, required_month, required_text, success},
    middleware::AuthUser,
};

/// Creates the monthly asset routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-assets", get(page))
        .route("/monthly-assets/records", post(create_record))
        .route("/monthly-assets/items", post(add_item))
        .route("/monthly-assets/items/update", post(update_item))
        .route("/monthly-assets/items/bulk", post(bulk_update_items))
        .route("/monthly-assets/items/delete", post(delete_item))
        .route("/monthly-assets/crypto", post(add_crypto))
        .route("/monthly-assets/crypto/update", post(update_crypto))
        .route("/monthly-assets/crypto/bulk", post(bulk_update_crypto))
        .route("/monthly-assets/crypto/delete", post(delete_crypto))
        .route("/monthly-assets/gold", post(add_gold))
        .route("/monthly-assets/gold/bulk", post(bulk_update_gold))
        .route("/monthly-assets/gold/delete", post(delete_gold))
        .route("/monthly-assets/create-from-previous", post(create_from_previous))
        .route("/monthly-assets/copy-from-previous", post(copy_from_previous))
}

// ============================================================================
// Page load
// ============================================================================

/// `?month=YYYY-MM`; the latest snapshot when absent.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    month: Option<String>,
}

/// Page data.
#[derive(Debug, Default, Serialize)]
pub struct MonthlyAssetsPage {
    /// All snapshots, newest first.
    pub asset_records: Vec<asset_records::Model>,
    /// Lines of the current snapshot.
    #[serde(flatten)]
    pub lines: RecordLines,
    /// Names used before, for input suggestions.
    #[serde(flatten)]
    pub names: ExistingNames,
    /// Month of the current snapshot, or the requested month.
    pub selected_month: Option<String>,
    /// The snapshot shown.
    pub current_record: Option<asset_records::Model>,
    /// The newest snapshot.
    pub latest_record: Option<asset_records::Model>,
    /// The snapshot before the current one, offered as copy source.
    pub previous_record: Option<asset_records::Model>,
}

/// GET /monthly-assets - Page load.
async fn page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MonthlyAssetsPage>> {
    let requested = non_blank(query.month);
    let Some(db) = state.db else {
        return Ok(Json(MonthlyAssetsPage {
            selected_month: requested,
            ..MonthlyAssetsPage::default()
        }));
    };

    let repo = AssetRepository::new(db);
    let (records, names) =
        try_join(repo.records(auth.id()), repo.existing_names(auth.id())).await?;

    let current_record = match requested.as_deref() {
        Some(raw) => raw.parse::<YearMonth>().ok().and_then(|month| {
            let key = month.to_string();
            records.iter().find(|r| r.record_date == key).cloned()
        }),
        None => records.first().cloned(),
    };
    let previous = current_record
        .as_ref()
        .and_then(|current| previous_record(&records, |r| r.id == current.id).cloned());
    let lines = match &current_record {
        Some(record) => repo.lines(record.id).await?,
        None => RecordLines::default(),
    };

    Ok(Json(MonthlyAssetsPage {
        latest_record: records.first().cloned(),
        selected_month: current_record
            .as_ref()
            .map(|r| r.record_date.clone())
            .or(requested),
        asset_records: records,
        lines,
        names,
        current_record,
        previous_record: previous,
    }))
}

// ============================================================================
// Snapshots
// ============================================================================

/// New snapshot form.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    record_date: Option<String>,
}

/// POST /monthly-assets/records
async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<RecordForm>,
) -> ApiResult<Json<Success>> {
    let record_date = required_month(form.record_date, "record_date")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .create_record(auth.id(), record_date)
        .await?;
    Ok(success())
}

/// Create-from-previous form.
#[derive(Debug, Deserialize)]
pub struct CreateFromPreviousForm {
    new_month: Option<String>,
    source_record_id: Option<String>,
}

/// POST /monthly-assets/create-from-previous
///
/// Creates the month, copies the source snapshot's lines if one is given,
/// then sends the browser to the new month.
async fn create_from_previous(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CreateFromPreviousForm>,
) -> ApiResult<Redirect> {
    let new_month = required_month(form.new_month, "new_month")?;
    let source = optional_id(form.source_record_id.as_deref(), "source_record_id")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .create_from_previous(auth.id(), new_month, source)
        .await?;
    Ok(Redirect::to(&format!("/monthly-assets?month={new_month}")))
}

/// Copy-from-previous form.
#[derive(Debug, Deserialize)]
pub struct CopyFromPreviousForm {
    current_record_id: Option<String>,
    source_record_id: Option<String>,
}

/// POST /monthly-assets/copy-from-previous
async fn copy_from_previous(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CopyFromPreviousForm>,
) -> ApiResult<Json<Success>> {
    let current = required_id(form.current_record_id.as_deref(), "current_record_id")?;
    let source = required_id(form.source_record_id.as_deref(), "source_record_id")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .copy_from_previous(auth.id(), current, source)
        .await?;
    Ok(success())
}

// ============================================================================
// Manual items
// ============================================================================

/// New item form.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    record_id: Option<String>,
    category: Option<String>,
    name: Option<String>,
    amount: Option<String>,
    memo: Option<String>,
}

/// POST /monthly-assets/items
async fn add_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<ItemForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let category = required_text(form.category, "category")?
        .trim()
        .parse::<AssetCategory>()
        .map_err(|e| ApiError::validation(e.to_string()))?;
    let item = NewAssetItem {
        category: category.as_str().to_string(),
        name: required_text(form.name, "name")?,
        amount: lenient_int(form.amount.as_deref().unwrap_or_default()),
        memo: non_blank(form.memo),
    };
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .add_item(auth.id(), record_id, item)
        .await?;
    Ok(success())
}

/// Item amount form.
#[derive(Debug, Deserialize)]
pub struct ItemAmountForm {
    item_id: Option<String>,
    amount: Option<String>,
}

/// POST /monthly-assets/items/update
async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<ItemAmountForm>,
) -> ApiResult<Json<Success>> {
    let update = ItemAmountUpdate {
        id: required_id(form.item_id.as_deref(), "item_id")?,
        amount: lenient_int(form.amount.as_deref().unwrap_or_default()),
    };
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .update_item_amount(auth.id(), update)
        .await?;
    Ok(success())
}

/// Bulk update form: `updates` is a JSON array.
#[derive(Debug, Deserialize)]
pub struct BulkForm {
    updates: Option<String>,
}

fn parse_updates<T: DeserializeOwned>(raw: Option<String>) -> ApiResult<Vec<T>> {
    let raw = non_blank(raw).ok_or_else(|| ApiError::validation("No updates given"))?;
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::validation(format!("updates is malformed: {e}")))
}

/// POST /monthly-assets/items/bulk
async fn bulk_update_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BulkForm>,
) -> ApiResult<Json<Success>> {
    let updates: Vec<ItemAmountUpdate> = parse_updates(form.updates)?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .bulk_update_items(auth.id(), &updates)
        .await?;
    Ok(success())
}

/// Item id form.
#[derive(Debug, Deserialize)]
pub struct ItemIdForm {
    item_id: Option<String>,
}

/// POST /monthly-assets/items/delete
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<ItemIdForm>,
) -> ApiResult<Json<Success>> {
    let item_id = required_id(form.item_id.as_deref(), "item_id")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .delete_item(auth.id(), item_id)
        .await?;
    Ok(success())
}

// ============================================================================
// Crypto
// ============================================================================

/// New crypto holding form.
#[derive(Debug, Deserialize)]
pub struct CryptoForm {
    record_id: Option<String>,
    name: Option<String>,
    quantity: Option<String>,
    usd_price: Option<String>,
    jpy_rate: Option<String>,
    memo: Option<String>,
}

/// POST /monthly-assets/crypto
async fn add_crypto(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CryptoForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let holding = NewCryptoHolding {
        name: required_text(form.name, "name")?,
        quantity: lenient_decimal(form.quantity.as_deref().unwrap_or_default()),
        usd_price: lenient_decimal(form.usd_price.as_deref().unwrap_or_default()),
        jpy_rate: lenient_jpy_rate(form.jpy_rate.as_deref().unwrap_or_default()),
        memo: non_blank(form.memo),
    };
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .add_crypto(auth.id(), record_id, holding)
        .await?;
    Ok(success())
}

/// Crypto price form.
#[derive(Debug, Deserialize)]
pub struct CryptoUpdateForm {
    crypto_id: Option<String>,
    quantity: Option<String>,
    usd_price: Option<String>,
    jpy_rate: Option<String>,
}

/// POST /monthly-assets/crypto/update
async fn update_crypto(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CryptoUpdateForm>,
) -> ApiResult<Json<Success>> {
    let update = CryptoUpdate {
        id: required_id(form.crypto_id.as_deref(), "crypto_id")?,
        quantity: lenient_decimal(form.quantity.as_deref().unwrap_or_default()),
        usd_price: lenient_decimal(form.usd_price.as_deref().unwrap_or_default()),
        jpy_rate: lenient_jpy_rate(form.jpy_rate.as_deref().unwrap_or_default()),
    };
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .update_crypto(auth.id(), update)
        .await?;
    Ok(success())
}

/// POST /monthly-assets/crypto/bulk
async fn bulk_update_crypto(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BulkForm>,
) -> ApiResult<Json<Success>> {
    let updates: Vec<CryptoUpdate> = parse_updates(form.updates)?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .bulk_update_crypto(auth.id(), &updates)
        .await?;
    Ok(success())
}

/// Crypto id form.
#[derive(Debug, Deserialize)]
pub struct CryptoIdForm {
    crypto_id: Option<String>,
}

/// POST /monthly-assets/crypto/delete
async fn delete_crypto(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CryptoIdForm>,
) -> ApiResult<Json<Success>> {
    let crypto_id = required_id(form.crypto_id.as_deref(), "crypto_id")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .delete_crypto(auth.id(), crypto_id)
        .await?;
    Ok(success())
}

// ============================================================================
// Gold
// ============================================================================

/// New gold holding form.
#[derive(Debug, Deserialize)]
pub struct GoldForm {
    record_id: Option<String>,
    name: Option<String>,
    quantity: Option<String>,
    jpy_price: Option<String>,
    memo: Option<String>,
}

/// POST /monthly-assets/gold
async fn add_gold(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<GoldForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let holding = NewGoldHolding {
        name: required_text(form.name, "name")?,
        quantity: lenient_decimal(form.quantity.as_deref().unwrap_or_default()),
        jpy_price: lenient_decimal(form.jpy_price.as_deref().unwrap_or_default()),
        memo: non_blank(form.memo),
    };
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .add_gold(auth.id(), record_id, holding)
        .await?;
    Ok(success())
}

/// POST /monthly-assets/gold/bulk
async fn bulk_update_gold(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BulkForm>,
) -> ApiResult<Json<Success>> {
    let updates: Vec<GoldUpdate> = parse_updates(form.updates)?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .bulk_update_gold(auth.id(), &updates)
        .await?;
    Ok(success())
}

/// Gold id form.
#[derive(Debug, Deserialize)]
pub struct GoldIdForm {
    gold_id: Option<String>,
}

/// POST /monthly-assets/gold/delete
async fn delete_gold(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<GoldIdForm>,
) -> ApiResult<Json<Success>> {
    let gold_id = required_id(form.gold_id.as_deref(), "gold_id")?;
    let db = state.store()?;

    AssetRepository::new(db.clone())
        .delete_gold(auth.id(), gold_id)
        .await?;
    Ok(success())
}
