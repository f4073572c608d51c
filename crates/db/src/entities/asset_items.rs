//! `SeaORM` Entity for asset_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_record_id: i32,
    /// Category key, see `kakeibo_core::assets::AssetCategory`.
    pub category: String,
    pub name: String,
    pub amount: i64,
    pub memo: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_records::Entity",
        from = "Column::AssetRecordId",
        to = "super::asset_records::Column::Id",
        on_delete = "Cascade"
    )]
    AssetRecords,
}

impl Related<super::asset_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
