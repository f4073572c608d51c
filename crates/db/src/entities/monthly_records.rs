//! `SeaORM` Entity for monthly_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// `YYYY-MM`, unique per user.
    pub year_month: String,
    pub expected_income: i64,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monthly_card_payments::Entity")]
    MonthlyCardPayments,
    #[sea_orm(has_many = "super::monthly_bank_payments::Entity")]
    MonthlyBankPayments,
    #[sea_orm(has_many = "super::monthly_bank_balances::Entity")]
    MonthlyBankBalances,
    #[sea_orm(has_many = "super::monthly_net_payments::Entity")]
    MonthlyNetPayments,
}

impl Related<super::monthly_card_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyCardPayments.def()
    }
}

impl Related<super::monthly_bank_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyBankPayments.def()
    }
}

impl Related<super::monthly_bank_balances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyBankBalances.def()
    }
}

impl Related<super::monthly_net_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyNetPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
