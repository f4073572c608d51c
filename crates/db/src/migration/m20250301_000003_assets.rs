//! Asset snapshots with manual items, crypto and precious metal holdings.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssetRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetRecords::UserId).integer().not_null())
                    .col(ColumnDef::new(AssetRecords::RecordDate).string_len(7).not_null())
                    .col(
                        ColumnDef::new(AssetRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_records_user")
                            .from(AssetRecords::Table, AssetRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One snapshot per user and month
        manager
            .create_index(
                Index::create()
                    .name("uq_asset_records_user_date")
                    .table(AssetRecords::Table)
                    .col(AssetRecords::UserId)
                    .col(AssetRecords::RecordDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AssetItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetItems::AssetRecordId).integer().not_null())
                    .col(ColumnDef::new(AssetItems::Category).string().not_null())
                    .col(ColumnDef::new(AssetItems::Name).string().not_null())
                    .col(
                        ColumnDef::new(AssetItems::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AssetItems::Memo).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_items_record")
                            .from(AssetItems::Table, AssetItems::AssetRecordId)
                            .to(AssetRecords::Table, AssetRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CryptoAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CryptoAssets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CryptoAssets::AssetRecordId).integer().not_null())
                    .col(ColumnDef::new(CryptoAssets::Name).string().not_null())
                    .col(
                        ColumnDef::new(CryptoAssets::Quantity)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CryptoAssets::UsdPrice)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CryptoAssets::JpyRate)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(150),
                    )
                    .col(ColumnDef::new(CryptoAssets::Memo).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_crypto_assets_record")
                            .from(CryptoAssets::Table, CryptoAssets::AssetRecordId)
                            .to(AssetRecords::Table, AssetRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoldAssets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoldAssets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GoldAssets::AssetRecordId).integer().not_null())
                    .col(ColumnDef::new(GoldAssets::Name).string().not_null())
                    .col(
                        ColumnDef::new(GoldAssets::Quantity)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(GoldAssets::JpyPrice)
                            .decimal_len(16, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(GoldAssets::Memo).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_gold_assets_record")
                            .from(GoldAssets::Table, GoldAssets::AssetRecordId)
                            .to(AssetRecords::Table, AssetRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Child lookups by snapshot
        manager
            .create_index(
                Index::create()
                    .name("idx_asset_items_record")
                    .table(AssetItems::Table)
                    .col(AssetItems::AssetRecordId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_crypto_assets_record")
                    .table(CryptoAssets::Table)
                    .col(CryptoAssets::AssetRecordId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_gold_assets_record")
                    .table(GoldAssets::Table)
                    .col(GoldAssets::AssetRecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GoldAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CryptoAssets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssetRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum AssetRecords {
    Table,
    Id,
    UserId,
    RecordDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AssetItems {
    Table,
    Id,
    AssetRecordId,
    Category,
    Name,
    Amount,
    Memo,
}

#[derive(DeriveIden)]
enum CryptoAssets {
    Table,
    Id,
    AssetRecordId,
    Name,
    Quantity,
    UsdPrice,
    JpyRate,
    Memo,
}

#[derive(DeriveIden)]
enum GoldAssets {
    Table,
    Id,
    AssetRecordId,
    Name,
    Quantity,
    JpyPrice,
    Memo,
}
