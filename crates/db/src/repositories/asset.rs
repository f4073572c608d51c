//! Asset snapshot repository.
//!
//! Child lines (items, crypto, gold) carry only their snapshot id, so every
//! child mutation is filtered through the set of snapshots the acting user
//! owns.

use futures::future::{try_join3, try_join_all};
use kakeibo_core::assets::{
    AssetCategory, AssetComparisonRow, CategoryBreakdown, CryptoUpdate, GoldUpdate,
    ItemAmountUpdate, NewAssetItem, NewCryptoHolding, NewGoldHolding, crypto_value, gold_value,
    with_changes,
};
use kakeibo_shared::types::YearMonth;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Query, SelectStatement},
};
use serde::Serialize;
use tracing::info;

use super::is_unique_violation;
use crate::entities::{asset_items, asset_records, crypto_assets, gold_assets};

/// Error types for asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// A snapshot for this month already exists.
    #[error("Asset record already exists: {0}")]
    AlreadyExists(String),

    /// Snapshot not found for this user.
    #[error("Asset record not found: {0}")]
    RecordNotFound(i32),

    /// Asset item not found for this user.
    #[error("Asset item not found: {0}")]
    ItemNotFound(i32),

    /// Crypto holding not found for this user.
    #[error("Crypto asset not found: {0}")]
    CryptoNotFound(i32),

    /// Gold holding not found for this user.
    #[error("Gold asset not found: {0}")]
    GoldNotFound(i32),

    /// A snapshot cannot be copied onto itself.
    #[error("Cannot copy asset record {0} onto itself")]
    SameRecord(i32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A distinct (category, name) pair used for input suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemName {
    /// Category key.
    pub category: String,
    /// Item name.
    pub name: String,
}

/// A distinct (name, memo) pair used for input suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingName {
    /// Holding name.
    pub name: String,
    /// Memo recorded with it.
    pub memo: Option<String>,
}

/// Lines of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordLines {
    /// Manual items, crypto category excluded, ordered by category then id.
    pub asset_items: Vec<asset_items::Model>,
    /// Crypto holdings by id.
    pub crypto_assets: Vec<crypto_assets::Model>,
    /// Gold holdings by id.
    pub gold_assets: Vec<gold_assets::Model>,
}

/// Names previously used across all of a user's snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExistingNames {
    /// Manual item names by category.
    pub existing_items: Vec<ItemName>,
    /// Crypto names.
    pub existing_cryptos: Vec<HoldingName>,
    /// Gold names.
    pub existing_golds: Vec<HoldingName>,
}

/// Repository for asset snapshots and their lines.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: DatabaseConnection,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists snapshots newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn records(&self, user_id: i32) -> Result<Vec<asset_records::Model>, DbErr> {
        asset_records::Entity::find()
            .filter(asset_records::Column::UserId.eq(user_id))
            .order_by_desc(asset_records::Column::RecordDate)
            .all(&self.db)
            .await
    }

    /// Finds the snapshot for a month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_date(
        &self,
        user_id: i32,
        record_date: YearMonth,
    ) -> Result<Option<asset_records::Model>, DbErr> {
        asset_records::Entity::find()
            .filter(asset_records::Column::UserId.eq(user_id))
            .filter(asset_records::Column::RecordDate.eq(record_date.to_string()))
            .one(&self.db)
            .await
    }

    /// Creates an empty snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the user has a snapshot for that month.
    pub async fn create_record(
        &self,
        user_id: i32,
        record_date: YearMonth,
    ) -> Result<asset_records::Model, AssetError> {
        let record = insert_record(&self.db, user_id, record_date).await?;
        info!(user_id, record_id = record.id, %record_date, "Asset record created");
        Ok(record)
    }

    /// Loads the lines of one snapshot.
    ///
    /// The caller must have resolved `record_id` through the acting user.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn lines(&self, record_id: i32) -> Result<RecordLines, DbErr> {
        let items = asset_items::Entity::find()
            .filter(asset_items::Column::AssetRecordId.eq(record_id))
            .filter(asset_items::Column::Category.ne(AssetCategory::Crypto.as_str()))
            .order_by_asc(asset_items::Column::Category)
            .order_by_asc(asset_items::Column::Id)
            .all(&self.db);
        let cryptos = crypto_assets::Entity::find()
            .filter(crypto_assets::Column::AssetRecordId.eq(record_id))
            .order_by_asc(crypto_assets::Column::Id)
            .all(&self.db);
        let golds = gold_assets::Entity::find()
            .filter(gold_assets::Column::AssetRecordId.eq(record_id))
            .order_by_asc(gold_assets::Column::Id)
            .all(&self.db);

        let (asset_items, crypto_assets, gold_assets) = try_join3(items, cryptos, golds).await?;
        Ok(RecordLines {
            asset_items,
            crypto_assets,
            gold_assets,
        })
    }

    /// Distinct names used in any of the user's snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn existing_names(&self, user_id: i32) -> Result<ExistingNames, DbErr> {
        let items = asset_items::Entity::find()
            .select_only()
            .column(asset_items::Column::Category)
            .column(asset_items::Column::Name)
            .distinct()
            .filter(asset_items::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .filter(asset_items::Column::Category.ne(AssetCategory::Crypto.as_str()))
            .order_by_asc(asset_items::Column::Category)
            .order_by_asc(asset_items::Column::Name)
            .into_tuple::<(String, String)>()
            .all(&self.db);
        let cryptos = crypto_assets::Entity::find()
            .select_only()
            .column(crypto_assets::Column::Name)
            .column(crypto_assets::Column::Memo)
            .distinct()
            .filter(crypto_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .order_by_asc(crypto_assets::Column::Name)
            .into_tuple::<(String, Option<String>)>()
            .all(&self.db);
        let golds = gold_assets::Entity::find()
            .select_only()
            .column(gold_assets::Column::Name)
            .column(gold_assets::Column::Memo)
            .distinct()
            .filter(gold_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .order_by_asc(gold_assets::Column::Name)
            .into_tuple::<(String, Option<String>)>()
            .all(&self.db);

        let (items, cryptos, golds) = try_join3(items, cryptos, golds).await?;
        let holding = |(name, memo)| HoldingName { name, memo };
        Ok(ExistingNames {
            existing_items: items
                .into_iter()
                .map(|(category, name)| ItemName { category, name })
                .collect(),
            existing_cryptos: cryptos.into_iter().map(holding).collect(),
            existing_golds: golds.into_iter().map(holding).collect(),
        })
    }

    /// Adds a manual item to a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the snapshot is not the user's.
    pub async fn add_item(
        &self,
        user_id: i32,
        record_id: i32,
        item: NewAssetItem,
    ) -> Result<asset_items::Model, AssetError> {
        require_record(&self.db, user_id, record_id).await?;
        let model = asset_items::ActiveModel {
            asset_record_id: Set(record_id),
            category: Set(item.category),
            name: Set(item.name),
            amount: Set(item.amount),
            memo: Set(item.memo),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Sets the amount of one item.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item is not the user's.
    pub async fn update_item_amount(
        &self,
        user_id: i32,
        update: ItemAmountUpdate,
    ) -> Result<(), AssetError> {
        update_item(&self.db, user_id, update).await
    }

    /// Sets the amounts of several items atomically.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` and changes nothing if any item is not the
    /// user's.
    pub async fn bulk_update_items(
        &self,
        user_id: i32,
        updates: &[ItemAmountUpdate],
    ) -> Result<(), AssetError> {
        let txn = self.db.begin().await?;
        for update in updates {
            update_item(&txn, user_id, *update).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Deletes one item.
    ///
    /// # Errors
    ///
    /// Returns `ItemNotFound` if the item is not the user's.
    pub async fn delete_item(&self, user_id: i32, item_id: i32) -> Result<(), AssetError> {
        let result = asset_items::Entity::delete_many()
            .filter(asset_items::Column::Id.eq(item_id))
            .filter(asset_items::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AssetError::ItemNotFound(item_id));
        }
        Ok(())
    }

    /// Adds a crypto holding to a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the snapshot is not the user's.
    pub async fn add_crypto(
        &self,
        user_id: i32,
        record_id: i32,
        holding: NewCryptoHolding,
    ) -> Result<crypto_assets::Model, AssetError> {
        require_record(&self.db, user_id, record_id).await?;
        let model = crypto_assets::ActiveModel {
            asset_record_id: Set(record_id),
            name: Set(holding.name),
            quantity: Set(holding.quantity),
            usd_price: Set(holding.usd_price),
            jpy_rate: Set(holding.jpy_rate),
            memo: Set(holding.memo),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Updates quantity and prices of one crypto holding.
    ///
    /// # Errors
    ///
    /// Returns `CryptoNotFound` if the holding is not the user's.
    pub async fn update_crypto(&self, user_id: i32, update: CryptoUpdate) -> Result<(), AssetError> {
        update_crypto(&self.db, user_id, update).await
    }

    /// Updates several crypto holdings atomically.
    ///
    /// # Errors
    ///
    /// Returns `CryptoNotFound` and changes nothing if any holding is not the
    /// user's.
    pub async fn bulk_update_crypto(
        &self,
        user_id: i32,
        updates: &[CryptoUpdate],
    ) -> Result<(), AssetError> {
        let txn = self.db.begin().await?;
        for update in updates {
            update_crypto(&txn, user_id, *update).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Deletes one crypto holding.
    ///
    /// # Errors
    ///
    /// Returns `CryptoNotFound` if the holding is not the user's.
    pub async fn delete_crypto(&self, user_id: i32, crypto_id: i32) -> Result<(), AssetError> {
        let result = crypto_assets::Entity::delete_many()
            .filter(crypto_assets::Column::Id.eq(crypto_id))
            .filter(crypto_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AssetError::CryptoNotFound(crypto_id));
        }
        Ok(())
    }

    /// Adds a gold holding to a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the snapshot is not the user's.
    pub async fn add_gold(
        &self,
        user_id: i32,
        record_id: i32,
        holding: NewGoldHolding,
    ) -> Result<gold_assets::Model, AssetError> {
        require_record(&self.db, user_id, record_id).await?;
        let model = gold_assets::ActiveModel {
            asset_record_id: Set(record_id),
            name: Set(holding.name),
            quantity: Set(holding.quantity),
            jpy_price: Set(holding.jpy_price),
            memo: Set(holding.memo),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(model)
    }

    /// Updates several gold holdings atomically.
    ///
    /// # Errors
    ///
    /// Returns `GoldNotFound` and changes nothing if any holding is not the
    /// user's.
    pub async fn bulk_update_gold(
        &self,
        user_id: i32,
        updates: &[GoldUpdate],
    ) -> Result<(), AssetError> {
        let txn = self.db.begin().await?;
        for update in updates {
            let result = gold_assets::Entity::update_many()
                .col_expr(gold_assets::Column::Quantity, Expr::value(update.quantity))
                .col_expr(gold_assets::Column::JpyPrice, Expr::value(update.jpy_price))
                .filter(gold_assets::Column::Id.eq(update.id))
                .filter(gold_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
                .exec(&txn)
                .await?;
            if result.rows_affected == 0 {
                return Err(AssetError::GoldNotFound(update.id));
            }
        }
        txn.commit().await?;
        Ok(())
    }

    /// Deletes one gold holding.
    ///
    /// # Errors
    ///
    /// Returns `GoldNotFound` if the holding is not the user's.
    pub async fn delete_gold(&self, user_id: i32, gold_id: i32) -> Result<(), AssetError> {
        let result = gold_assets::Entity::delete_many()
            .filter(gold_assets::Column::Id.eq(gold_id))
            .filter(gold_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AssetError::GoldNotFound(gold_id));
        }
        Ok(())
    }

    /// Creates a snapshot for `record_date`, optionally seeded with copies of
    /// another snapshot's lines. Runs in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the month is taken, `RecordNotFound` if the
    /// source is not the user's.
    pub async fn create_from_previous(
        &self,
        user_id: i32,
        record_date: YearMonth,
        source_record_id: Option<i32>,
    ) -> Result<asset_records::Model, AssetError> {
        let txn = self.db.begin().await?;

        if let Some(source) = source_record_id {
            require_record(&txn, user_id, source).await?;
        }
        let record = insert_record(&txn, user_id, record_date).await?;
        if let Some(source) = source_record_id {
            copy_lines(&txn, source, record.id).await?;
        }

        txn.commit().await?;
        info!(
            user_id,
            record_id = record.id,
            source_record_id,
            %record_date,
            "Asset record created from previous"
        );
        Ok(record)
    }

    /// Replaces the lines of `current_record_id` with copies of the lines of
    /// `source_record_id`. Runs in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `SameRecord` if both ids are equal, `RecordNotFound` if either
    /// snapshot is not the user's.
    pub async fn copy_from_previous(
        &self,
        user_id: i32,
        current_record_id: i32,
        source_record_id: i32,
    ) -> Result<(), AssetError> {
        if current_record_id == source_record_id {
            return Err(AssetError::SameRecord(current_record_id));
        }

        let txn = self.db.begin().await?;

        require_record(&txn, user_id, current_record_id).await?;
        require_record(&txn, user_id, source_record_id).await?;

        asset_items::Entity::delete_many()
            .filter(asset_items::Column::AssetRecordId.eq(current_record_id))
            .exec(&txn)
            .await?;
        crypto_assets::Entity::delete_many()
            .filter(crypto_assets::Column::AssetRecordId.eq(current_record_id))
            .exec(&txn)
            .await?;
        gold_assets::Entity::delete_many()
            .filter(gold_assets::Column::AssetRecordId.eq(current_record_id))
            .exec(&txn)
            .await?;

        copy_lines(&txn, source_record_id, current_record_id).await?;

        txn.commit().await?;
        info!(user_id, current_record_id, source_record_id, "Asset lines copied");
        Ok(())
    }

    /// Category totals of one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn breakdown(&self, record_id: i32) -> Result<CategoryBreakdown, DbErr> {
        let items = asset_items::Entity::find()
            .select_only()
            .column(asset_items::Column::Category)
            .column(asset_items::Column::Amount)
            .filter(asset_items::Column::AssetRecordId.eq(record_id))
            .into_tuple::<(String, i64)>()
            .all(&self.db);
        let cryptos = crypto_assets::Entity::find()
            .select_only()
            .column(crypto_assets::Column::Quantity)
            .column(crypto_assets::Column::UsdPrice)
            .column(crypto_assets::Column::JpyRate)
            .filter(crypto_assets::Column::AssetRecordId.eq(record_id))
            .into_tuple::<(Decimal, Decimal, Decimal)>()
            .all(&self.db);
        let golds = gold_assets::Entity::find()
            .select_only()
            .column(gold_assets::Column::Quantity)
            .column(gold_assets::Column::JpyPrice)
            .filter(gold_assets::Column::AssetRecordId.eq(record_id))
            .into_tuple::<(Decimal, Decimal)>()
            .all(&self.db);

        let (items, cryptos, golds) = try_join3(items, cryptos, golds).await?;

        let crypto_total = cryptos
            .into_iter()
            .map(|(q, usd, rate)| crypto_value(q, usd, rate))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let gold_total = golds
            .into_iter()
            .map(|(q, price)| gold_value(q, price))
            .fold(Decimal::ZERO, Decimal::saturating_add);

        Ok(CategoryBreakdown::build(
            items.iter().map(|(category, amount)| (category.as_str(), *amount)),
            crypto_total,
            gold_total,
        ))
    }

    /// Category totals of every snapshot, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn breakdowns(&self, user_id: i32) -> Result<Vec<(String, CategoryBreakdown)>, DbErr> {
        let records = asset_records::Entity::find()
            .filter(asset_records::Column::UserId.eq(user_id))
            .order_by_asc(asset_records::Column::RecordDate)
            .all(&self.db)
            .await?;

        try_join_all(records.into_iter().map(|record| async move {
            let breakdown = self.breakdown(record.id).await?;
            Ok::<_, DbErr>((record.record_date, breakdown))
        }))
        .await
    }

    /// Category totals with change against the previous snapshot, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn comparison(&self, user_id: i32) -> Result<Vec<AssetComparisonRow>, DbErr> {
        Ok(with_changes(self.breakdowns(user_id).await?))
    }
}

/// Ids of the snapshots owned by `user_id`.
fn owned_records(user_id: i32) -> SelectStatement {
    Query::select()
        .column(asset_records::Column::Id)
        .from(asset_records::Entity)
        .and_where(asset_records::Column::UserId.eq(user_id))
        .to_owned()
}

async fn require_record<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    record_id: i32,
) -> Result<asset_records::Model, AssetError> {
    asset_records::Entity::find_by_id(record_id)
        .filter(asset_records::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(AssetError::RecordNotFound(record_id))
}

async fn insert_record<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    record_date: YearMonth,
) -> Result<asset_records::Model, AssetError> {
    asset_records::ActiveModel {
        user_id: Set(user_id),
        record_date: Set(record_date.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AssetError::AlreadyExists(record_date.to_string())
        } else {
            AssetError::Database(e)
        }
    })
}

async fn update_item<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    update: ItemAmountUpdate,
) -> Result<(), AssetError> {
    let result = asset_items::Entity::update_many()
        .col_expr(asset_items::Column::Amount, Expr::value(update.amount))
        .filter(asset_items::Column::Id.eq(update.id))
        .filter(asset_items::Column::AssetRecordId.in_subquery(owned_records(user_id)))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AssetError::ItemNotFound(update.id));
    }
    Ok(())
}

async fn update_crypto<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    update: CryptoUpdate,
) -> Result<(), AssetError> {
    let result = crypto_assets::Entity::update_many()
        .col_expr(crypto_assets::Column::Quantity, Expr::value(update.quantity))
        .col_expr(crypto_assets::Column::UsdPrice, Expr::value(update.usd_price))
        .col_expr(crypto_assets::Column::JpyRate, Expr::value(update.jpy_rate))
        .filter(crypto_assets::Column::Id.eq(update.id))
        .filter(crypto_assets::Column::AssetRecordId.in_subquery(owned_records(user_id)))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AssetError::CryptoNotFound(update.id));
    }
    Ok(())
}

/// Copies every line of `from` into `to`.
async fn copy_lines<C: ConnectionTrait>(conn: &C, from: i32, to: i32) -> Result<(), DbErr> {
    let items = asset_items::Entity::find()
        .filter(asset_items::Column::AssetRecordId.eq(from))
        .order_by_asc(asset_items::Column::Id)
        .all(conn)
        .await?;
    if !items.is_empty() {
        asset_items::Entity::insert_many(items.into_iter().map(|item| asset_items::ActiveModel {
            asset_record_id: Set(to),
            category: Set(item.category),
            name: Set(item.name),
            amount: Set(item.amount),
            memo: Set(item.memo),
            ..Default::default()
        }))
        .exec_without_returning(conn)
        .await?;
    }

    let cryptos = crypto_assets::Entity::find()
        .filter(crypto_assets::Column::AssetRecordId.eq(from))
        .order_by_asc(crypto_assets::Column::Id)
        .all(conn)
        .await?;
    if !cryptos.is_empty() {
        crypto_assets::Entity::insert_many(cryptos.into_iter().map(|c| crypto_assets::ActiveModel {
            asset_record_id: Set(to),
            name: Set(c.name),
            quantity: Set(c.quantity),
            usd_price: Set(c.usd_price),
            jpy_rate: Set(c.jpy_rate),
            memo: Set(c.memo),
            ..Default::default()
        }))
        .exec_without_returning(conn)
        .await?;
    }

    let golds = gold_assets::Entity::find()
        .filter(gold_assets::Column::AssetRecordId.eq(from))
        .order_by_asc(gold_assets::Column::Id)
        .all(conn)
        .await?;
    if !golds.is_empty() {
        gold_assets::Entity::insert_many(golds.into_iter().map(|g| gold_assets::ActiveModel {
            asset_record_id: Set(to),
            name: Set(g.name),
            quantity: Set(g.quantity),
            jpy_price: Set(g.jpy_price),
            memo: Set(g.memo),
            ..Default::default()
        }))
        .exec_without_returning(conn)
        .await?;
    }

    Ok(())
}
