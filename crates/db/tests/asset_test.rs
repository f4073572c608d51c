//! Integration tests for asset snapshots.

mod common;

use common::{create_user, month, setup_db};
use kakeibo_core::assets::{
    CryptoUpdate, GoldUpdate, ItemAmountUpdate, NewAssetItem, NewCryptoHolding, NewGoldHolding,
};
use kakeibo_db::{AssetError, AssetRepository};
use rust_decimal_macros::dec;

fn item(category: &str, name: &str, amount: i64) -> NewAssetItem {
    NewAssetItem {
        category: category.to_string(),
        name: name.to_string(),
        amount,
        memo: None,
    }
}

fn btc() -> NewCryptoHolding {
    NewCryptoHolding {
        name: "BTC".to_string(),
        quantity: dec!(0.5),
        usd_price: dec!(100),
        jpy_rate: dec!(150),
        memo: Some("cold wallet".to_string()),
    }
}

fn gold_bar() -> NewGoldHolding {
    NewGoldHolding {
        name: "Gold bar".to_string(),
        quantity: dec!(2.5),
        jpy_price: dec!(10000),
        memo: None,
    }
}

#[tokio::test]
async fn test_duplicate_record_conflicts() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    repo.create_record(user.id, month("2024-03")).await.unwrap();
    let second = repo.create_record(user.id, month("2024-03")).await;

    assert!(matches!(second, Err(AssetError::AlreadyExists(_))));
    assert_eq!(repo.records(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_breakdown_combines_all_lines() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let record = repo.create_record(user.id, month("2024-03")).await.unwrap();
    repo.add_item(user.id, record.id, item("cash", "Wallet", 1_000)).await.unwrap();
    repo.add_item(user.id, record.id, item("points", "Airline", 200)).await.unwrap();
    repo.add_item(user.id, record.id, item("securities", "Index fund", 5_000))
        .await
        .unwrap();
    repo.add_crypto(user.id, record.id, btc()).await.unwrap();
    repo.add_gold(user.id, record.id, gold_bar()).await.unwrap();

    let breakdown = repo.breakdown(record.id).await.unwrap();
    assert_eq!(breakdown.cash, 1_000);
    assert_eq!(breakdown.points, 200);
    assert_eq!(breakdown.securities, 5_000);
    assert_eq!(breakdown.crypto, 7_500);
    assert_eq!(breakdown.real_assets, 25_000);
    assert_eq!(breakdown.total, 38_700);
}

#[tokio::test]
async fn test_lines_exclude_crypto_items() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let record = repo.create_record(user.id, month("2024-03")).await.unwrap();
    repo.add_item(user.id, record.id, item("securities", "Fund", 1)).await.unwrap();
    repo.add_item(user.id, record.id, item("cash", "Wallet", 2)).await.unwrap();
    repo.add_item(user.id, record.id, item("crypto", "Exchange", 3)).await.unwrap();

    let lines = repo.lines(record.id).await.unwrap();
    let names: Vec<_> = lines.asset_items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Wallet", "Fund"]);
}

#[tokio::test]
async fn test_create_from_previous_copies_lines() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let feb = repo.create_record(user.id, month("2024-02")).await.unwrap();
    repo.add_item(user.id, feb.id, item("cash", "Wallet", 1_000)).await.unwrap();
    repo.add_crypto(user.id, feb.id, btc()).await.unwrap();
    repo.add_gold(user.id, feb.id, gold_bar()).await.unwrap();

    let mar = repo
        .create_from_previous(user.id, month("2024-03"), Some(feb.id))
        .await
        .unwrap();

    let lines = repo.lines(mar.id).await.unwrap();
    assert_eq!(lines.asset_items.len(), 1);
    assert_eq!(lines.asset_items[0].amount, 1_000);
    assert_eq!(lines.crypto_assets[0].memo.as_deref(), Some("cold wallet"));
    assert_eq!(lines.gold_assets[0].quantity, dec!(2.5));

    // The source is untouched.
    assert_eq!(repo.lines(feb.id).await.unwrap().asset_items.len(), 1);
}

#[tokio::test]
async fn test_create_from_foreign_source_rolls_back() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let bob_record = repo.create_record(bob.id, month("2024-02")).await.unwrap();
    let result = repo
        .create_from_previous(alice.id, month("2024-03"), Some(bob_record.id))
        .await;

    assert!(matches!(result, Err(AssetError::RecordNotFound(_))));
    assert!(repo.records(alice.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_copy_from_previous_replaces_lines() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let feb = repo.create_record(user.id, month("2024-02")).await.unwrap();
    repo.add_item(user.id, feb.id, item("cash", "Wallet", 1_000)).await.unwrap();
    let mar = repo.create_record(user.id, month("2024-03")).await.unwrap();
    repo.add_item(user.id, mar.id, item("points", "Old", 5)).await.unwrap();
    repo.add_gold(user.id, mar.id, gold_bar()).await.unwrap();

    repo.copy_from_previous(user.id, mar.id, feb.id).await.unwrap();

    let lines = repo.lines(mar.id).await.unwrap();
    assert_eq!(lines.asset_items.len(), 1);
    assert_eq!(lines.asset_items[0].name, "Wallet");
    assert!(lines.gold_assets.is_empty());
}

#[tokio::test]
async fn test_copy_onto_itself_keeps_lines() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let mar = repo.create_record(user.id, month("2024-03")).await.unwrap();
    repo.add_item(user.id, mar.id, item("cash", "Wallet", 1_000)).await.unwrap();

    assert!(matches!(
        repo.copy_from_previous(user.id, mar.id, mar.id).await,
        Err(AssetError::SameRecord(id)) if id == mar.id
    ));
    assert_eq!(repo.lines(mar.id).await.unwrap().asset_items.len(), 1);
}

#[tokio::test]
async fn test_child_mutations_scoped_to_owner() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let record = repo.create_record(alice.id, month("2024-03")).await.unwrap();
    let wallet = repo
        .add_item(alice.id, record.id, item("cash", "Wallet", 1_000))
        .await
        .unwrap();
    let coin = repo.add_crypto(alice.id, record.id, btc()).await.unwrap();
    let bar = repo.add_gold(alice.id, record.id, gold_bar()).await.unwrap();

    assert!(matches!(
        repo.add_item(bob.id, record.id, item("cash", "x", 1)).await,
        Err(AssetError::RecordNotFound(_))
    ));
    assert!(matches!(
        repo.update_item_amount(bob.id, ItemAmountUpdate { id: wallet.id, amount: 0 })
            .await,
        Err(AssetError::ItemNotFound(_))
    ));
    assert!(matches!(
        repo.delete_item(bob.id, wallet.id).await,
        Err(AssetError::ItemNotFound(_))
    ));
    assert!(matches!(
        repo.delete_crypto(bob.id, coin.id).await,
        Err(AssetError::CryptoNotFound(_))
    ));
    assert!(matches!(
        repo.delete_gold(bob.id, bar.id).await,
        Err(AssetError::GoldNotFound(_))
    ));

    assert_eq!(repo.breakdown(record.id).await.unwrap().total, 33_500);
}

#[tokio::test]
async fn test_bulk_update_is_all_or_nothing() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let record = repo.create_record(user.id, month("2024-03")).await.unwrap();
    let wallet = repo
        .add_item(user.id, record.id, item("cash", "Wallet", 1_000))
        .await
        .unwrap();

    let result = repo
        .bulk_update_items(
            user.id,
            &[
                ItemAmountUpdate { id: wallet.id, amount: 9_999 },
                ItemAmountUpdate { id: wallet.id + 100, amount: 1 },
            ],
        )
        .await;
    assert!(matches!(result, Err(AssetError::ItemNotFound(_))));
    assert_eq!(repo.breakdown(record.id).await.unwrap().cash, 1_000);

    repo.bulk_update_items(user.id, &[ItemAmountUpdate { id: wallet.id, amount: 2_000 }])
        .await
        .unwrap();
    assert_eq!(repo.breakdown(record.id).await.unwrap().cash, 2_000);
}

#[tokio::test]
async fn test_bulk_price_updates() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let record = repo.create_record(user.id, month("2024-03")).await.unwrap();
    let coin = repo.add_crypto(user.id, record.id, btc()).await.unwrap();
    let bar = repo.add_gold(user.id, record.id, gold_bar()).await.unwrap();

    repo.bulk_update_crypto(
        user.id,
        &[CryptoUpdate {
            id: coin.id,
            quantity: dec!(1),
            usd_price: dec!(200),
            jpy_rate: dec!(150),
        }],
    )
    .await
    .unwrap();
    repo.bulk_update_gold(
        user.id,
        &[GoldUpdate {
            id: bar.id,
            quantity: dec!(1),
            jpy_price: dec!(12000),
        }],
    )
    .await
    .unwrap();

    let breakdown = repo.breakdown(record.id).await.unwrap();
    assert_eq!(breakdown.crypto, 30_000);
    assert_eq!(breakdown.real_assets, 12_000);
}

#[tokio::test]
async fn test_comparison_changes_oldest_first() {
    let db = setup_db().await;
    let user = create_user(&db, "alice@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let mar = repo.create_record(user.id, month("2024-03")).await.unwrap();
    let feb = repo.create_record(user.id, month("2024-02")).await.unwrap();
    repo.add_item(user.id, feb.id, item("cash", "Wallet", 200)).await.unwrap();
    repo.add_item(user.id, mar.id, item("cash", "Wallet", 150)).await.unwrap();
    repo.add_item(user.id, mar.id, item("points", "Airline", 50)).await.unwrap();

    let rows = repo.comparison(user.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record_date, "2024-02");
    assert!(rows[0].changes.cash.is_none());
    assert_eq!(rows[1].changes.cash, Some(dec!(-25)));
    assert_eq!(rows[1].changes.points, Some(dec!(100)));
    assert_eq!(rows[1].changes.crypto, Some(dec!(0)));
}

#[tokio::test]
async fn test_existing_names_span_user_records() {
    let db = setup_db().await;
    let alice = create_user(&db, "alice@example.com").await;
    let bob = create_user(&db, "bob@example.com").await;
    let repo = AssetRepository::new(db.clone());

    let feb = repo.create_record(alice.id, month("2024-02")).await.unwrap();
    let mar = repo.create_record(alice.id, month("2024-03")).await.unwrap();
    let other = repo.create_record(bob.id, month("2024-03")).await.unwrap();
    repo.add_item(alice.id, feb.id, item("cash", "Wallet", 1)).await.unwrap();
    repo.add_item(alice.id, mar.id, item("cash", "Wallet", 2)).await.unwrap();
    repo.add_crypto(alice.id, mar.id, btc()).await.unwrap();
    repo.add_item(bob.id, other.id, item("cash", "Secret", 3)).await.unwrap();

    let names = repo.existing_names(alice.id).await.unwrap();
    assert_eq!(names.existing_items.len(), 1);
    assert_eq!(names.existing_items[0].name, "Wallet");
    assert_eq!(names.existing_cryptos[0].name, "BTC");
    assert!(names.existing_golds.is_empty());
}
