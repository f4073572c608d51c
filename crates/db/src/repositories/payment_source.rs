//! Payment card and bank master data.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use tracing::info;

use super::is_unique_violation;
use crate::entities::{banks, payment_cards};

/// Error types for payment source operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentSourceError {
    /// Card not found for this user.
    #[error("Card not found: {0}")]
    CardNotFound(i32),

    /// Bank not found for this user.
    #[error("Bank not found: {0}")]
    BankNotFound(i32),

    /// A card with this name already exists.
    #[error("Card already exists: {0}")]
    DuplicateCard(String),

    /// A bank with this name already exists.
    #[error("Bank already exists: {0}")]
    DuplicateBank(String),

    /// Payment day outside 1..=31.
    #[error("Payment day must be between 1 and 31, got {0}")]
    InvalidPaymentDay(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for a user's cards and banks.
#[derive(Debug, Clone)]
pub struct PaymentSourceRepository {
    db: DatabaseConnection,
}

impl PaymentSourceRepository {
    /// Creates a new payment source repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active cards in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_cards(&self, user_id: i32) -> Result<Vec<payment_cards::Model>, DbErr> {
        payment_cards::Entity::find()
            .filter(payment_cards::Column::UserId.eq(user_id))
            .filter(payment_cards::Column::IsActive.eq(true))
            .order_by_asc(payment_cards::Column::DisplayOrder)
            .order_by_asc(payment_cards::Column::Id)
            .all(&self.db)
            .await
    }

    /// Lists active banks in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_banks(&self, user_id: i32) -> Result<Vec<banks::Model>, DbErr> {
        banks::Entity::find()
            .filter(banks::Column::UserId.eq(user_id))
            .filter(banks::Column::IsActive.eq(true))
            .order_by_asc(banks::Column::DisplayOrder)
            .order_by_asc(banks::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a card owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_card(
        &self,
        user_id: i32,
        card_id: i32,
    ) -> Result<Option<payment_cards::Model>, DbErr> {
        payment_cards::Entity::find_by_id(card_id)
            .filter(payment_cards::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Finds a bank owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_bank(&self, user_id: i32, bank_id: i32) -> Result<Option<banks::Model>, DbErr> {
        banks::Entity::find_by_id(bank_id)
            .filter(banks::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Adds a card, optionally linked to one of the user's banks.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCard` if the name is taken, `BankNotFound` if the
    /// bank is not the user's.
    pub async fn add_card(
        &self,
        user_id: i32,
        name: &str,
        bank_id: Option<i32>,
    ) -> Result<payment_cards::Model, PaymentSourceError> {
        if let Some(bank_id) = bank_id {
            self.require_bank(user_id, bank_id).await?;
        }

        let card = payment_cards::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            display_order: Set(0),
            bank_id: Set(bank_id),
            payment_day: Set(None),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PaymentSourceError::DuplicateCard(name.to_string())
            } else {
                PaymentSourceError::Database(e)
            }
        })?;

        info!(user_id, card_id = card.id, "Card added");
        Ok(card)
    }

    /// Adds a bank.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBank` if the name is taken.
    pub async fn add_bank(&self, user_id: i32, name: &str) -> Result<banks::Model, PaymentSourceError> {
        let bank = banks::ActiveModel {
            user_id: Set(user_id),
            name: Set(name.to_string()),
            display_order: Set(0),
            is_active: Set(true),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PaymentSourceError::DuplicateBank(name.to_string())
            } else {
                PaymentSourceError::Database(e)
            }
        })?;

        info!(user_id, bank_id = bank.id, "Bank added");
        Ok(bank)
    }

    /// Links a card to a bank, or unlinks it with `None`.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` or `BankNotFound` if either is not the user's.
    pub async fn set_card_bank(
        &self,
        user_id: i32,
        card_id: i32,
        bank_id: Option<i32>,
    ) -> Result<(), PaymentSourceError> {
        if let Some(bank_id) = bank_id {
            self.require_bank(user_id, bank_id).await?;
        }

        let result = payment_cards::Entity::update_many()
            .col_expr(payment_cards::Column::BankId, Expr::value(bank_id))
            .filter(payment_cards::Column::Id.eq(card_id))
            .filter(payment_cards::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PaymentSourceError::CardNotFound(card_id));
        }
        Ok(())
    }

    /// Sets or clears the day of month a card is settled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPaymentDay` outside 1..=31, `CardNotFound` if the card
    /// is not the user's.
    pub async fn set_card_payment_day(
        &self,
        user_id: i32,
        card_id: i32,
        payment_day: Option<i64>,
    ) -> Result<(), PaymentSourceError> {
        let payment_day = match payment_day {
            Some(day @ 1..=31) => i32::try_from(day).ok(),
            Some(day) => return Err(PaymentSourceError::InvalidPaymentDay(day)),
            None => None,
        };

        let result = payment_cards::Entity::update_many()
            .col_expr(payment_cards::Column::PaymentDay, Expr::value(payment_day))
            .filter(payment_cards::Column::Id.eq(card_id))
            .filter(payment_cards::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PaymentSourceError::CardNotFound(card_id));
        }
        Ok(())
    }

    /// Hides a card from the active list. Past payments are kept.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if the card is not the user's.
    pub async fn deactivate_card(&self, user_id: i32, card_id: i32) -> Result<(), PaymentSourceError> {
        let result = payment_cards::Entity::update_many()
            .col_expr(payment_cards::Column::IsActive, Expr::value(false))
            .filter(payment_cards::Column::Id.eq(card_id))
            .filter(payment_cards::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PaymentSourceError::CardNotFound(card_id));
        }
        info!(user_id, card_id, "Card deactivated");
        Ok(())
    }

    /// Hides a bank from the active list. Past balances are kept.
    ///
    /// # Errors
    ///
    /// Returns `BankNotFound` if the bank is not the user's.
    pub async fn deactivate_bank(&self, user_id: i32, bank_id: i32) -> Result<(), PaymentSourceError> {
        let result = banks::Entity::update_many()
            .col_expr(banks::Column::IsActive, Expr::value(false))
            .filter(banks::Column::Id.eq(bank_id))
            .filter(banks::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(PaymentSourceError::BankNotFound(bank_id));
        }
        info!(user_id, bank_id, "Bank deactivated");
        Ok(())
    }

    async fn require_bank(&self, user_id: i32, bank_id: i32) -> Result<(), PaymentSourceError> {
        self.find_bank(user_id, bank_id)
            .await?
            .map(|_| ())
            .ok_or(PaymentSourceError::BankNotFound(bank_id))
    }
}
