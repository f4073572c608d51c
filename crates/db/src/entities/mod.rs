//! `SeaORM` entity definitions.

pub mod asset_items;
pub mod asset_records;
pub mod banks;
pub mod crypto_assets;
pub mod documents;
pub mod gold_assets;
pub mod monthly_bank_balances;
pub mod monthly_bank_payments;
pub mod monthly_card_payments;
pub mod monthly_net_payments;
pub mod monthly_records;
pub mod payment_cards;
pub mod sessions;
pub mod users;
