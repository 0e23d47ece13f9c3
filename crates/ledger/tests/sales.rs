use chrono::Utc;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use ledger::{EntrySource, Ledger, LedgerError, ProfileRole, RecordSaleCmd};
use migration::MigratorTrait;

async fn ledger_with_db() -> (Ledger, DatabaseConnection, Uuid) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db.clone()).build();
    let admin = ledger
        .create_profile("alice", ProfileRole::Admin)
        .await
        .unwrap();
    (ledger, db, admin)
}

#[tokio::test]
async fn a_settled_sale_decrements_stock_and_credits_the_account() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 5, 0, admin)
        .await
        .unwrap();

    let (sale_id, total) = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin).item(product_id, 3),
        )
        .await
        .unwrap();
    assert_eq!(total, 750);

    let product = ledger.product(product_id).await.unwrap();
    assert_eq!(product.current_stock, 2);

    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 750);

    let entries = ledger.entries_for_account(account_id, 10).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source, Some(EntrySource::Sale(sale_id)));

    let (sale, items) = ledger.sale(sale_id).await.unwrap();
    assert!(sale.settled);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].subtotal_minor, 750);
}

#[tokio::test]
async fn oversold_stock_fails_atomically() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 5, 0, admin)
        .await
        .unwrap();

    ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin).item(product_id, 3),
        )
        .await
        .unwrap();

    let err = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin).item(product_id, 3),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStock(_)));

    // neither the stock nor the balance moved for the failed sale
    let product = ledger.product(product_id).await.unwrap();
    assert_eq!(product.current_stock, 2);
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 750);
}

#[tokio::test]
async fn an_unsettled_sale_posts_no_money() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 5, 0, admin)
        .await
        .unwrap();

    let (_sale_id, total) = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "credit", Utc::now(), admin)
                .customer_name("Carol")
                .item(product_id, 2)
                .unsettled(),
        )
        .await
        .unwrap();
    assert_eq!(total, 500);

    // stock is committed, money is not
    let product = ledger.product(product_id).await.unwrap();
    assert_eq!(product.current_stock, 3);
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 0);
    assert!(ledger
        .entries_for_account(account_id, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn per_line_price_overrides_the_list_price() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 10, 0, admin)
        .await
        .unwrap();

    let (_sale_id, total) = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin)
                .item_priced(product_id, 4, 200),
        )
        .await
        .unwrap();
    assert_eq!(total, 800);
}

#[tokio::test]
async fn degenerate_sales_are_rejected() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 10, 0, admin)
        .await
        .unwrap();

    // no items
    let err = ledger
        .record_sale(RecordSaleCmd::new(account_id, "cash", Utc::now(), admin))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    // non-positive quantity
    let err = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin).item(product_id, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    // negative price override
    let err = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin)
                .item_priced(product_id, 1, -10),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn a_sale_total_that_overflows_is_rejected_atomically() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("candle", 250, 10, 0, admin)
        .await
        .unwrap();

    let err = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin)
                .item_priced(product_id, 2, i64::MAX),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    // the stock decrement rolled back with the rest
    let product = ledger.product(product_id).await.unwrap();
    assert_eq!(product.current_stock, 10);
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 0);
}

#[tokio::test]
async fn sale_payments_must_land_on_a_receiving_account() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("petty box", 0, false, admin)
        .await
        .unwrap();
    let product_id = ledger
        .create_product("candle", 250, 10, 0, admin)
        .await
        .unwrap();

    let err = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "cash", Utc::now(), admin).item(product_id, 1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}
