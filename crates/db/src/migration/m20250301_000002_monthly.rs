//! Payment sources (cards, banks) and monthly income records.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Banks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Banks::UserId).integer().not_null())
                    .col(ColumnDef::new(Banks::Name).string().not_null())
                    .col(
                        ColumnDef::new(Banks::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Banks::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Banks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_banks_user")
                            .from(Banks::Table, Banks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_banks_user_name")
                    .table(Banks::Table)
                    .col(Banks::UserId)
                    .col(Banks::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentCards::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentCards::UserId).integer().not_null())
                    .col(ColumnDef::new(PaymentCards::Name).string().not_null())
                    .col(
                        ColumnDef::new(PaymentCards::DisplayOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PaymentCards::BankId).integer().null())
                    .col(ColumnDef::new(PaymentCards::PaymentDay).integer().null())
                    .col(
                        ColumnDef::new(PaymentCards::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PaymentCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_cards_user")
                            .from(PaymentCards::Table, PaymentCards::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_cards_bank")
                            .from(PaymentCards::Table, PaymentCards::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_payment_cards_user_name")
                    .table(PaymentCards::Table)
                    .col(PaymentCards::UserId)
                    .col(PaymentCards::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MonthlyRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MonthlyRecords::UserId).integer().not_null())
                    .col(ColumnDef::new(MonthlyRecords::YearMonth).string_len(7).not_null())
                    .col(
                        ColumnDef::new(MonthlyRecords::ExpectedIncome)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MonthlyRecords::Notes).text().null())
                    .col(
                        ColumnDef::new(MonthlyRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(MonthlyRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_records_user")
                            .from(MonthlyRecords::Table, MonthlyRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One record per user and month
        manager
            .create_index(
                Index::create()
                    .name("uq_monthly_records_user_month")
                    .table(MonthlyRecords::Table)
                    .col(MonthlyRecords::UserId)
                    .col(MonthlyRecords::YearMonth)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyCardPayments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyCardPayments::MonthlyRecordId).integer().not_null())
                    .col(ColumnDef::new(MonthlyCardPayments::CardId).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyCardPayments::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonthlyCardPayments::MonthlyRecordId)
                            .col(MonthlyCardPayments::CardId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_card_payments_record")
                            .from(MonthlyCardPayments::Table, MonthlyCardPayments::MonthlyRecordId)
                            .to(MonthlyRecords::Table, MonthlyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_card_payments_card")
                            .from(MonthlyCardPayments::Table, MonthlyCardPayments::CardId)
                            .to(PaymentCards::Table, PaymentCards::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyBankPayments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyBankPayments::MonthlyRecordId).integer().not_null())
                    .col(ColumnDef::new(MonthlyBankPayments::BankId).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyBankPayments::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonthlyBankPayments::MonthlyRecordId)
                            .col(MonthlyBankPayments::BankId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_bank_payments_record")
                            .from(MonthlyBankPayments::Table, MonthlyBankPayments::MonthlyRecordId)
                            .to(MonthlyRecords::Table, MonthlyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_bank_payments_bank")
                            .from(MonthlyBankPayments::Table, MonthlyBankPayments::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyBankBalances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyBankBalances::MonthlyRecordId).integer().not_null())
                    .col(ColumnDef::new(MonthlyBankBalances::BankId).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyBankBalances::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonthlyBankBalances::MonthlyRecordId)
                            .col(MonthlyBankBalances::BankId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_bank_balances_record")
                            .from(MonthlyBankBalances::Table, MonthlyBankBalances::MonthlyRecordId)
                            .to(MonthlyRecords::Table, MonthlyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_bank_balances_bank")
                            .from(MonthlyBankBalances::Table, MonthlyBankBalances::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MonthlyNetPayments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MonthlyNetPayments::MonthlyRecordId).integer().not_null())
                    .col(ColumnDef::new(MonthlyNetPayments::BankId).integer().not_null())
                    .col(
                        ColumnDef::new(MonthlyNetPayments::Amount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .col(MonthlyNetPayments::MonthlyRecordId)
                            .col(MonthlyNetPayments::BankId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_net_payments_record")
                            .from(MonthlyNetPayments::Table, MonthlyNetPayments::MonthlyRecordId)
                            .to(MonthlyRecords::Table, MonthlyRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_monthly_net_payments_bank")
                            .from(MonthlyNetPayments::Table, MonthlyNetPayments::BankId)
                            .to(Banks::Table, Banks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MonthlyNetPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyBankBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyBankPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyCardPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MonthlyRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Banks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Banks {
    Table,
    Id,
    UserId,
    Name,
    DisplayOrder,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentCards {
    Table,
    Id,
    UserId,
    Name,
    DisplayOrder,
    BankId,
    PaymentDay,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MonthlyRecords {
    Table,
    Id,
    UserId,
    YearMonth,
    ExpectedIncome,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MonthlyCardPayments {
    Table,
    MonthlyRecordId,
    CardId,
    Amount,
}

#[derive(DeriveIden)]
enum MonthlyBankPayments {
    Table,
    MonthlyRecordId,
    BankId,
    Amount,
}

#[derive(DeriveIden)]
enum MonthlyBankBalances {
    Table,
    MonthlyRecordId,
    BankId,
    Balance,
}

#[derive(DeriveIden)]
enum MonthlyNetPayments {
    Table,
    MonthlyRecordId,
    BankId,
    Amount,
}
