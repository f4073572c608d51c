//! Monthly income page and its actions.
//!
//! A month holds the expected take-home income, free notes and four kinds of
//! lines: card payments, bank payments, bank balances and net payments. The
//! page also manages the card and bank masters those lines refer to.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use futures::future::try_join4;
use kakeibo_core::input::{lenient_int, optional_int};
use kakeibo_db::{
    MonthlyRepository, PaymentSourceRepository,
    entities::{banks, payment_cards},
    repositories::monthly::{BankLine, MonthlyLines},
};
use kakeibo_shared::types::YearMonth;
use serde::{Deserialize, Serialize};

use crate::{
    ApiResult, AppState,
    form::{
        Success, line_amount, optional_id, required_id, required_month, required_text, success,
    },
    middleware::AuthUser,
};

/// Creates the monthly income routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-income", get(page))
        .route("/monthly-income/create-month", post(create_month))
        .route("/monthly-income/expected-income", post(update_expected_income))
        .route("/monthly-income/notes", post(update_notes))
        .route("/monthly-income/card-payment", post(upsert_card_payment))
        .route("/monthly-income/bank-payment", post(upsert_bank_payment))
        .route("/monthly-income/bank-balance", post(upsert_bank_balance))
        .route("/monthly-income/net-payment", post(upsert_net_payment))
        .route("/monthly-income/cards", post(add_card))
        .route("/monthly-income/card-bank", post(update_card_bank))
        .route("/monthly-income/card-payment-day", post(update_card_payment_day))
        .route("/monthly-income/banks", post(add_bank))
        .route("/monthly-income/cards/delete", post(delete_card))
        .route("/monthly-income/banks/delete", post(delete_bank))
}

/// `?month=YYYY-MM`.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    month: Option<String>,
}

/// Page data.
#[derive(Debug, Serialize)]
pub struct MonthlyIncomePage {
    /// Active cards in display order.
    pub cards: Vec<payment_cards::Model>,
    /// Active banks in display order.
    pub banks: Vec<banks::Model>,
    /// The month shown.
    pub selected_month: String,
    /// Months with a record, newest first.
    pub available_months: Vec<String>,
    /// The record of the selected month, if created.
    pub monthly_data: Option<MonthlyData>,
}

/// One month's record with its lines.
#[derive(Debug, Serialize)]
pub struct MonthlyData {
    /// Record id.
    pub id: i32,
    /// Expected take-home income.
    pub expected_income: i64,
    /// Notes, empty when unset.
    pub notes: String,
    /// Lines joined with card and bank names.
    #[serde(flatten)]
    pub lines: MonthlyLines,
}

/// GET /monthly-income - Page load.
async fn page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> ApiResult<Json<MonthlyIncomePage>> {
    let month = query
        .month
        .as_deref()
        .and_then(|m| m.parse::<YearMonth>().ok())
        .unwrap_or_else(YearMonth::current);

    let Some(db) = state.db.clone() else {
        return Ok(Json(MonthlyIncomePage {
            cards: Vec::new(),
            banks: Vec::new(),
            selected_month: month.to_string(),
            available_months: Vec::new(),
            monthly_data: None,
        }));
    };

    let sources = PaymentSourceRepository::new(db.clone());
    let repo = MonthlyRepository::new(db);
    let user_id = auth.id();

    let (cards, banks, available_months, record) = try_join4(
        sources.active_cards(user_id),
        sources.active_banks(user_id),
        repo.months(user_id),
        repo.find_by_month(user_id, month),
    )
    .await?;

    let monthly_data = match record {
        Some(record) => Some(MonthlyData {
            id: record.id,
            expected_income: record.expected_income,
            notes: record.notes.unwrap_or_default(),
            lines: repo.lines(record.id).await?,
        }),
        None => None,
    };

    Ok(Json(MonthlyIncomePage {
        cards,
        banks,
        selected_month: month.to_string(),
        available_months,
        monthly_data,
    }))
}

/// Create-month form.
#[derive(Debug, Deserialize)]
pub struct CreateMonthForm {
    year_month: Option<String>,
}

/// POST /monthly-income/create-month
async fn create_month(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CreateMonthForm>,
) -> ApiResult<Json<Success>> {
    let month = required_month(form.year_month, "year_month")?;
    let db = state.store()?;

    MonthlyRepository::new(db.clone())
        .create(auth.id(), month)
        .await?;
    Ok(success())
}

/// Record amount form.
#[derive(Debug, Deserialize)]
pub struct RecordAmountForm {
    record_id: Option<String>,
    amount: Option<String>,
}

/// POST /monthly-income/expected-income
async fn update_expected_income(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<RecordAmountForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let amount = lenient_int(form.amount.as_deref().unwrap_or_default());
    let db = state.store()?;

    MonthlyRepository::new(db.clone())
        .set_expected_income(auth.id(), record_id, amount)
        .await?;
    Ok(success())
}

/// Notes form.
#[derive(Debug, Deserialize)]
pub struct NotesForm {
    record_id: Option<String>,
    notes: Option<String>,
}

/// POST /monthly-income/notes
async fn update_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<NotesForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let db = state.store()?;

    MonthlyRepository::new(db.clone())
        .set_notes(auth.id(), record_id, form.notes.as_deref().unwrap_or_default())
        .await?;
    Ok(success())
}

/// Card payment form.
#[derive(Debug, Deserialize)]
pub struct CardPaymentForm {
    record_id: Option<String>,
    card_id: Option<String>,
    amount: Option<String>,
}

/// POST /monthly-income/card-payment
async fn upsert_card_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CardPaymentForm>,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let card_id = required_id(form.card_id.as_deref(), "card_id")?;
    let amount = line_amount(form.amount.as_deref(), "amount")?;
    let db = state.store()?;

    MonthlyRepository::new(db.clone())
        .upsert_card_payment(auth.id(), record_id, card_id, amount)
        .await?;
    Ok(success())
}

/// Bank line form. Balances post `balance`, the other lines `amount`.
#[derive(Debug, Deserialize)]
pub struct BankLineForm {
    record_id: Option<String>,
    bank_id: Option<String>,
    amount: Option<String>,
    balance: Option<String>,
}

async fn upsert_bank_line(
    state: &AppState,
    auth: &AuthUser,
    form: BankLineForm,
    line: BankLine,
) -> ApiResult<Json<Success>> {
    let record_id = required_id(form.record_id.as_deref(), "record_id")?;
    let bank_id = required_id(form.bank_id.as_deref(), "bank_id")?;
    let (raw, field) = match line {
        BankLine::Balance => (form.balance, "balance"),
        BankLine::Payment | BankLine::NetPayment => (form.amount, "amount"),
    };
    let amount = line_amount(raw.as_deref(), field)?;
    let db = state.store()?;

    MonthlyRepository::new(db.clone())
        .upsert_bank_line(auth.id(), record_id, bank_id, line, amount)
        .await?;
    Ok(success())
}

/// POST /monthly-income/bank-payment
async fn upsert_bank_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BankLineForm>,
) -> ApiResult<Json<Success>> {
    upsert_bank_line(&state, &auth, form, BankLine::Payment).await
}

/// POST /monthly-income/bank-balance
async fn upsert_bank_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BankLineForm>,
) -> ApiResult<Json<Success>> {
    upsert_bank_line(&state, &auth, form, BankLine::Balance).await
}

/// POST /monthly-income/net-payment
async fn upsert_net_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BankLineForm>,
) -> ApiResult<Json<Success>> {
    upsert_bank_line(&state, &auth, form, BankLine::NetPayment).await
}

/// Add-card form.
#[derive(Debug, Deserialize)]
pub struct AddCardForm {
    name: Option<String>,
    bank_id: Option<String>,
}

/// POST /monthly-income/cards
async fn add_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<AddCardForm>,
) -> ApiResult<Json<Success>> {
    let name = required_text(form.name, "name")?;
    let bank_id = optional_id(form.bank_id.as_deref(), "bank_id")?;
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .add_card(auth.id(), &name, bank_id)
        .await?;
    Ok(success())
}

/// Card-bank link form; a blank `bank_id` unlinks.
#[derive(Debug, Deserialize)]
pub struct CardBankForm {
    card_id: Option<String>,
    bank_id: Option<String>,
}

/// POST /monthly-income/card-bank
async fn update_card_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CardBankForm>,
) -> ApiResult<Json<Success>> {
    let card_id = required_id(form.card_id.as_deref(), "card_id")?;
    let bank_id = optional_id(form.bank_id.as_deref(), "bank_id")?;
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .set_card_bank(auth.id(), card_id, bank_id)
        .await?;
    Ok(success())
}

/// Payment-day form; a blank day clears it.
#[derive(Debug, Deserialize)]
pub struct CardPaymentDayForm {
    card_id: Option<String>,
    payment_day: Option<String>,
}

/// POST /monthly-income/card-payment-day
async fn update_card_payment_day(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CardPaymentDayForm>,
) -> ApiResult<Json<Success>> {
    let card_id = required_id(form.card_id.as_deref(), "card_id")?;
    let payment_day = optional_int(form.payment_day.as_deref());
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .set_card_payment_day(auth.id(), card_id, payment_day)
        .await?;
    Ok(success())
}

/// Add-bank form.
#[derive(Debug, Deserialize)]
pub struct AddBankForm {
    name: Option<String>,
}

/// POST /monthly-income/banks
async fn add_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<AddBankForm>,
) -> ApiResult<Json<Success>> {
    let name = required_text(form.name, "name")?;
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .add_bank(auth.id(), &name)
        .await?;
    Ok(success())
}

/// Card id form.
#[derive(Debug, Deserialize)]
pub struct CardIdForm {
    card_id: Option<String>,
}

/// POST /monthly-income/cards/delete - Deactivate a card.
async fn delete_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<CardIdForm>,
) -> ApiResult<Json<Success>> {
    let card_id = required_id(form.card_id.as_deref(), "card_id")?;
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .deactivate_card(auth.id(), card_id)
        .await?;
    Ok(success())
}

/// Bank id form.
#[derive(Debug, Deserialize)]
pub struct BankIdForm {
    bank_id: Option<String>,
}

/// POST /monthly-income/banks/delete - Deactivate a bank.
async fn delete_bank(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BankIdForm>,
) -> ApiResult<Json<Success>> {
    let bank_id = required_id(form.bank_id.as_deref(), "bank_id")?;
    let db = state.store()?;

    PaymentSourceRepository::new(db.clone())
        .deactivate_bank(auth.id(), bank_id)
        .await?;
    Ok(success())
}
