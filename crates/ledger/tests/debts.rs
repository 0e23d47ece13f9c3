use chrono::{NaiveDate, Utc};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use ledger::{
    CreateDebtCmd, DebtStatus, Debtor, Ledger, LedgerError, ProfileRole, RecordDebtPaymentCmd,
    RecordSaleCmd,
};
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

fn due_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn debt_of(amount_minor: i64, actor_id: Uuid) -> CreateDebtCmd {
    CreateDebtCmd::new(
        Debtor::Member("m-17".to_string()),
        "event float",
        amount_minor,
        due_date(),
        actor_id,
    )
}

fn payment(debt_id: Uuid, amount_minor: i64, account_id: Uuid, actor_id: Uuid) -> RecordDebtPaymentCmd {
    RecordDebtPaymentCmd {
        debt_id,
        amount_minor,
        paid_at: Utc::now(),
        method: "cash".to_string(),
        account_id,
        notes: None,
        actor_id,
    }
}

#[tokio::test]
async fn payments_walk_the_debt_down_to_paid() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let debt_id = ledger.create_debt(debt_of(30_000, admin)).await.unwrap();

    let (due, status) = ledger
        .record_debt_payment(payment(debt_id, 10_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(due, 20_000);
    assert_eq!(status, DebtStatus::PartiallyPaid);

    let (due, status) = ledger
        .record_debt_payment(payment(debt_id, 20_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(due, 0);
    assert_eq!(status, DebtStatus::Paid);

    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 30_000);

    let rows = ledger.debt_payments(debt_id).await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn payment_above_the_amount_due_is_rejected() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let debt_id = ledger.create_debt(debt_of(10_000, admin)).await.unwrap();

    let err = ledger
        .record_debt_payment(payment(debt_id, 10_001, account_id, admin))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AmountExceedsDue(_)));

    // nothing moved
    let debt = ledger.debt(debt_id).await.unwrap();
    assert_eq!(debt.amount_due_minor, 10_000);
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 0);
}

#[tokio::test]
async fn a_debt_with_payments_cannot_be_deleted() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let debt_id = ledger.create_debt(debt_of(10_000, admin)).await.unwrap();

    ledger
        .record_debt_payment(payment(debt_id, 4_000, account_id, admin))
        .await
        .unwrap();

    let err = ledger.delete_debt(debt_id, admin).await.unwrap_err();
    assert!(matches!(err, LedgerError::HasPayments(_)));

    // without payments the delete goes through
    let other = ledger.create_debt(debt_of(5_000, admin)).await.unwrap();
    ledger.delete_debt(other, admin).await.unwrap();
    let err = ledger.debt(other).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn sale_linked_debt_takes_its_amount_from_the_sale() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let product_id = ledger
        .create_product("raffle ticket", 500, 100, 0, admin)
        .await
        .unwrap();

    let (sale_id, total) = ledger
        .record_sale(
            RecordSaleCmd::new(account_id, "credit", Utc::now(), admin)
                .customer_name("Carol")
                .item(product_id, 6)
                .unsettled(),
        )
        .await
        .unwrap();
    assert_eq!(total, 3_000);

    // the explicit amount is ignored in favor of the sale total
    let debt_id = ledger
        .create_debt(
            CreateDebtCmd::new(
                Debtor::Customer("Carol".to_string()),
                "unpaid sale",
                0,
                due_date(),
                admin,
            )
            .sale_id(sale_id),
        )
        .await
        .unwrap();

    let debt = ledger.debt(debt_id).await.unwrap();
    assert_eq!(debt.original_amount_minor, 3_000);
    assert_eq!(debt.amount_due_minor, 3_000);
    assert_eq!(debt.sale_id, Some(sale_id));

    // a mismatching explicit amount is a hard error
    let err = ledger
        .create_debt(
            CreateDebtCmd::new(
                Debtor::Customer("Carol".to_string()),
                "unpaid sale",
                9_999,
                due_date(),
                admin,
            )
            .sale_id(sale_id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn non_positive_debts_are_rejected() {
    let (ledger, _db, admin) = ledger_with_db().await;

    let err = ledger.create_debt(debt_of(0, admin)).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}
