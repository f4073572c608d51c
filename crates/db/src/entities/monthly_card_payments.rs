//! `SeaORM` Entity for monthly_card_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_card_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub monthly_record_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub card_id: i32,
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
        belongs_to = "super::payment_cards::Entity",
        from = "Column::CardId",
        to = "super::payment_cards::Column::Id",
        on_delete = "Cascade"
    )]
    PaymentCards,
}

impl Related<super::monthly_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyRecords.def()
    }
}

impl Related<super::payment_cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentCards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
