//! `SeaORM` Entity for asset_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// `YYYY-MM`, unique per user.
    pub record_date: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::asset_items::Entity")]
    AssetItems,
    #[sea_orm(has_many = "super::crypto_assets::Entity")]
    CryptoAssets,
    #[sea_orm(has_many = "super::gold_assets::Entity")]
    GoldAssets,
}

impl Related<super::asset_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetItems.def()
    }
}

impl Related<super::crypto_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CryptoAssets.def()
    }
}

impl Related<super::gold_assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoldAssets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
