//! Monthly income record repository.
//!
//! A monthly record holds the expected income for one month plus four kinds
//! of per-source lines: card payments, bank payments, bank balances and net
//! payments. Lines are upserted on their (record, source) key.

use futures::future::{try_join, try_join_all, try_join4};
use kakeibo_core::monthly::{ComparisonRow, IncomeReportRow, MonthlyTotals};
use kakeibo_shared::types::YearMonth;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};
use serde::Serialize;
use tracing::info;

use super::is_unique_violation;
use crate::entities::{
    banks, monthly_bank_balances, monthly_bank_payments, monthly_card_payments,
    monthly_net_payments, monthly_records, payment_cards,
};

/// Error types for monthly record operations.
#[derive(Debug, thiserror::Error)]
pub enum MonthlyError {
    /// A record for this month already exists.
    #[error("Month already exists: {0}")]
    AlreadyExists(String),

    /// Record not found for this user.
    #[error("Monthly record not found: {0}")]
    RecordNotFound(i32),

    /// Card not found for this user.
    #[error("Card not found: {0}")]
    CardNotFound(i32),

    /// Bank not found for this user.
    #[error("Bank not found: {0}")]
    BankNotFound(i32),

    /// Payment and balance lines never go below zero.
    #[error("Negative amount: {0}")]
    NegativeAmount(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Which per-bank line table an upsert targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankLine {
    /// Direct debits from the bank.
    Payment,
    /// Balance held in the bank.
    Balance,
    /// Net amount after offsetting.
    NetPayment,
}

/// A card payment joined with the card name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardAmount {
    /// Card id.
    pub card_id: i32,
    /// Card name.
    pub card_name: String,
    /// Amount in yen.
    pub amount: i64,
}

/// A per-bank amount joined with the bank name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankAmount {
    /// Bank id.
    pub bank_id: i32,
    /// Bank name.
    pub bank_name: String,
    /// Amount in yen.
    pub amount: i64,
}

/// All lines of one monthly record, each ordered by source display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyLines {
    /// Card payments.
    pub card_payments: Vec<CardAmount>,
    /// Direct bank payments.
    pub bank_payments: Vec<BankAmount>,
    /// Bank balances.
    pub bank_balances: Vec<BankAmount>,
    /// Net payments.
    pub net_payments: Vec<BankAmount>,
}

/// Repository for monthly records and their lines.
#[derive(Debug, Clone)]
pub struct MonthlyRepository {
    db: DatabaseConnection,
}

impl MonthlyRepository {
    /// Creates a new monthly repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the months that have a record, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn months(&self, user_id: i32) -> Result<Vec<String>, DbErr> {
        monthly_records::Entity::find()
            .select_only()
            .column(monthly_records::Column::YearMonth)
            .filter(monthly_records::Column::UserId.eq(user_id))
            .order_by_desc(monthly_records::Column::YearMonth)
            .into_tuple::<String>()
            .all(&self.db)
            .await
    }

    /// Finds the record for a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_month(
        &self,
        user_id: i32,
        month: YearMonth,
    ) -> Result<Option<monthly_records::Model>, DbErr> {
        monthly_records::Entity::find()
            .filter(monthly_records::Column::UserId.eq(user_id))
            .filter(monthly_records::Column::YearMonth.eq(month.to_string()))
            .one(&self.db)
            .await
    }

    /// Creates an empty record for a month.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the user already has a record for `month`.
    pub async fn create(
        &self,
        user_id: i32,
        month: YearMonth,
    ) -> Result<monthly_records::Model, MonthlyError> {
        let now = chrono::Utc::now();
        let record = monthly_records::ActiveModel {
            user_id: Set(user_id),
            year_month: Set(month.to_string()),
            expected_income: Set(0),
            notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                MonthlyError::AlreadyExists(month.to_string())
            } else {
                MonthlyError::Database(e)
            }
        })?;

        info!(user_id, record_id = record.id, month = %month, "Monthly record created");
        Ok(record)
    }

    /// Sets the expected income of a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the record is not the user's.
    pub async fn set_expected_income(
        &self,
        user_id: i32,
        record_id: i32,
        amount: i64,
    ) -> Result<(), MonthlyError> {
        self.update_record(
            user_id,
            record_id,
            monthly_records::Column::ExpectedIncome,
            Expr::value(amount),
        )
        .await
    }

    /// Replaces the notes of a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the record is not the user's.
    pub async fn set_notes(
        &self,
        user_id: i32,
        record_id: i32,
        notes: &str,
    ) -> Result<(), MonthlyError> {
        self.update_record(user_id, record_id, monthly_records::Column::Notes, Expr::value(notes))
            .await
    }

    async fn update_record(
        &self,
        user_id: i32,
        record_id: i32,
        column: monthly_records::Column,
        value: sea_orm::sea_query::SimpleExpr,
    ) -> Result<(), MonthlyError> {
        let result = monthly_records::Entity::update_many()
            .col_expr(column, value)
            .col_expr(
                monthly_records::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(monthly_records::Column::Id.eq(record_id))
            .filter(monthly_records::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(MonthlyError::RecordNotFound(record_id));
        }
        Ok(())
    }

    /// Inserts or replaces a card payment.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for an amount below zero, and `RecordNotFound`
    /// or `CardNotFound` if either is not the user's.
    pub async fn upsert_card_payment(
        &self,
        user_id: i32,
        record_id: i32,
        card_id: i32,
        amount: i64,
    ) -> Result<(), MonthlyError> {
        if amount < 0 {
            return Err(MonthlyError::NegativeAmount(amount));
        }
        self.require_record(user_id, record_id).await?;
        payment_cards::Entity::find_by_id(card_id)
            .filter(payment_cards::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(MonthlyError::CardNotFound(card_id))?;

        monthly_card_payments::Entity::insert(monthly_card_payments::ActiveModel {
            monthly_record_id: Set(record_id),
            card_id: Set(card_id),
            amount: Set(amount),
        })
        .on_conflict(
            OnConflict::columns([
                monthly_card_payments::Column::MonthlyRecordId,
                monthly_card_payments::Column::CardId,
            ])
            .update_column(monthly_card_payments::Column::Amount)
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await?;

        Ok(())
    }

    /// Inserts or replaces one of the per-bank lines.
    ///
    /// # Errors
    ///
    /// Returns `NegativeAmount` for an amount below zero, and `RecordNotFound`
    /// or `BankNotFound` if either is not the user's.
    pub async fn upsert_bank_line(
        &self,
        user_id: i32,
        record_id: i32,
        bank_id: i32,
        line: BankLine,
        amount: i64,
    ) -> Result<(), MonthlyError> {
        if amount < 0 {
            return Err(MonthlyError::NegativeAmount(amount));
        }
        self.require_record(user_id, record_id).await?;
        banks::Entity::find_by_id(bank_id)
            .filter(banks::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(MonthlyError::BankNotFound(bank_id))?;

        match line {
            BankLine::Payment => {
                monthly_bank_payments::Entity::insert(monthly_bank_payments::ActiveModel {
                    monthly_record_id: Set(record_id),
                    bank_id: Set(bank_id),
                    amount: Set(amount),
                })
                .on_conflict(
                    OnConflict::columns([
                        monthly_bank_payments::Column::MonthlyRecordId,
                        monthly_bank_payments::Column::BankId,
                    ])
                    .update_column(monthly_bank_payments::Column::Amount)
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            }
            BankLine::Balance => {
                monthly_bank_balances::Entity::insert(monthly_bank_balances::ActiveModel {
                    monthly_record_id: Set(record_id),
                    bank_id: Set(bank_id),
                    balance: Set(amount),
                })
                .on_conflict(
                    OnConflict::columns([
                        monthly_bank_balances::Column::MonthlyRecordId,
                        monthly_bank_balances::Column::BankId,
                    ])
                    .update_column(monthly_bank_balances::Column::Balance)
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            }
            BankLine::NetPayment => {
                monthly_net_payments::Entity::insert(monthly_net_payments::ActiveModel {
                    monthly_record_id: Set(record_id),
                    bank_id: Set(bank_id),
                    amount: Set(amount),
                })
                .on_conflict(
                    OnConflict::columns([
                        monthly_net_payments::Column::MonthlyRecordId,
                        monthly_net_payments::Column::BankId,
                    ])
                    .update_column(monthly_net_payments::Column::Amount)
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            }
        }

        Ok(())
    }

    /// Loads all lines of a record, joined with source names.
    ///
    /// The caller must have resolved `record_id` through the acting user.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn lines(&self, record_id: i32) -> Result<MonthlyLines, DbErr> {
        let cards = monthly_card_payments::Entity::find()
            .filter(monthly_card_payments::Column::MonthlyRecordId.eq(record_id))
            .find_also_related(payment_cards::Entity)
            .order_by_asc(payment_cards::Column::DisplayOrder)
            .order_by_asc(payment_cards::Column::Id)
            .all(&self.db);
        let bank_payments = monthly_bank_payments::Entity::find()
            .filter(monthly_bank_payments::Column::MonthlyRecordId.eq(record_id))
            .find_also_related(banks::Entity)
            .order_by_asc(banks::Column::DisplayOrder)
            .order_by_asc(banks::Column::Id)
            .all(&self.db);
        let bank_balances = monthly_bank_balances::Entity::find()
            .filter(monthly_bank_balances::Column::MonthlyRecordId.eq(record_id))
            .find_also_related(banks::Entity)
            .order_by_asc(banks::Column::DisplayOrder)
            .order_by_asc(banks::Column::Id)
            .all(&self.db);
        let net_payments = monthly_net_payments::Entity::find()
            .filter(monthly_net_payments::Column::MonthlyRecordId.eq(record_id))
            .find_also_related(banks::Entity)
            .order_by_asc(banks::Column::DisplayOrder)
            .order_by_asc(banks::Column::Id)
            .all(&self.db);

        let (cards, bank_payments, bank_balances, net_payments) =
            try_join4(cards, bank_payments, bank_balances, net_payments).await?;

        Ok(MonthlyLines {
            card_payments: cards
                .into_iter()
                .filter_map(|(line, card)| {
                    card.map(|c| CardAmount {
                        card_id: line.card_id,
                        card_name: c.name,
                        amount: line.amount,
                    })
                })
                .collect(),
            bank_payments: bank_payments
                .into_iter()
                .filter_map(|(line, bank)| bank_amount(line.bank_id, line.amount, bank))
                .collect(),
            bank_balances: bank_balances
                .into_iter()
                .filter_map(|(line, bank)| bank_amount(line.bank_id, line.balance, bank))
                .collect(),
            net_payments: net_payments
                .into_iter()
                .filter_map(|(line, bank)| bank_amount(line.bank_id, line.amount, bank))
                .collect(),
        })
    }

    /// Sums card payments and bank balances of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn totals(&self, record_id: i32) -> Result<MonthlyTotals, DbErr> {
        let payments = monthly_card_payments::Entity::find()
            .select_only()
            .column(monthly_card_payments::Column::Amount)
            .filter(monthly_card_payments::Column::MonthlyRecordId.eq(record_id))
            .into_tuple::<i64>()
            .all(&self.db);
        let balances = monthly_bank_balances::Entity::find()
            .select_only()
            .column(monthly_bank_balances::Column::Balance)
            .filter(monthly_bank_balances::Column::MonthlyRecordId.eq(record_id))
            .into_tuple::<i64>()
            .all(&self.db);

        let (payments, balances) = try_join(payments, balances).await?;
        Ok(MonthlyTotals::from_amounts(payments, balances))
    }

    /// Builds the comparison table, newest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn comparison(&self, user_id: i32) -> Result<Vec<ComparisonRow>, DbErr> {
        let records = self.records(user_id, Order::NewestFirst).await?;
        try_join_all(records.into_iter().map(|record| async move {
            let totals = self.totals(record.id).await?;
            Ok::<_, DbErr>(ComparisonRow::new(
                record.id,
                record.year_month,
                record.expected_income,
                record.notes,
                totals,
            ))
        }))
        .await
    }

    /// Builds the income report, oldest month first.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn income_report(&self, user_id: i32) -> Result<Vec<IncomeReportRow>, DbErr> {
        let records = self.records(user_id, Order::OldestFirst).await?;
        try_join_all(records.into_iter().map(|record| async move {
            let totals = self.totals(record.id).await?;
            Ok::<_, DbErr>(IncomeReportRow::new(
                record.year_month,
                record.expected_income,
                totals,
            ))
        }))
        .await
    }

    async fn records(
        &self,
        user_id: i32,
        order: Order,
    ) -> Result<Vec<monthly_records::Model>, DbErr> {
        let query = monthly_records::Entity::find()
            .filter(monthly_records::Column::UserId.eq(user_id));
        let query = match order {
            Order::NewestFirst => query.order_by_desc(monthly_records::Column::YearMonth),
            Order::OldestFirst => query.order_by_asc(monthly_records::Column::YearMonth),
        };
        query.all(&self.db).await
    }

    async fn require_record(&self, user_id: i32, record_id: i32) -> Result<(), MonthlyError> {
        monthly_records::Entity::find_by_id(record_id)
            .filter(monthly_records::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(MonthlyError::RecordNotFound(record_id))
    }
}

#[derive(Debug, Clone, Copy)]
enum Order {
    NewestFirst,
    OldestFirst,
}

fn bank_amount(bank_id: i32, amount: i64, bank: Option<banks::Model>) -> Option<BankAmount> {
    bank.map(|b| BankAmount {
        bank_id,
        bank_name: b.name,
        amount,
    })
}
