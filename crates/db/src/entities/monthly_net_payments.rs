//! `SeaORM` Entity for monthly_net_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_net_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub monthly_record_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub bank_id: i32,
    pub amount: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monthly_records::Entity",
        from = "Column::MonthlyRecordId",
        to = "super::monthly_records::Column::Id",
        on_delete = "Cascade"
    )]
    MonthlyRecords,
    #[sea_orm(
        belongs_to = "super::banks::Entity",
        from = "Column::BankId",
        to = "super::banks::Column::Id",
        on_delete = "Cascade"
    )]
    Banks,
}

impl Related<super::monthly_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyRecords.def()
    }
}

impl Related<super::banks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Banks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
