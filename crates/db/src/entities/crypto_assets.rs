//! `SeaORM` Entity for crypto_assets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "crypto_assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_record_id: i32,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub quantity: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub usd_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 6)))")]
    pub jpy_rate: Decimal,
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
