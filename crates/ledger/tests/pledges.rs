use chrono::{NaiveDate, Utc};
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

use ledger::{
    CreatePledgeCmd, EntrySource, Ledger, LedgerError, PledgeStatus, ProfileRole,
    RecordPledgePaymentCmd, UpdatePledgeCmd,
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

fn pledge_of(amount_minor: i64, actor_id: Uuid) -> CreatePledgeCmd {
    CreatePledgeCmd {
        member_id: "m-17".to_string(),
        project_id: "roof".to_string(),
        amount_minor,
        due_date: due_date(),
        comments: None,
        actor_id,
    }
}

fn payment(pledge_id: Uuid, amount_minor: i64, account_id: Uuid, actor_id: Uuid) -> RecordPledgePaymentCmd {
    RecordPledgePaymentCmd {
        pledge_id,
        amount_minor,
        account_id,
        paid_at: Utc::now(),
        actor_id,
    }
}

#[tokio::test]
async fn partial_then_full_payment_flips_status_to_paid() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(20_000, admin)).await.unwrap();

    let (paid, status) = ledger
        .record_pledge_payment(payment(pledge_id, 12_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(paid, 12_000);
    assert_eq!(status, PledgeStatus::Active);

    let (paid, status) = ledger
        .record_pledge_payment(payment(pledge_id, 8_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(paid, 20_000);
    assert_eq!(status, PledgeStatus::Paid);

    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 20_000);
}

#[tokio::test]
async fn overpayment_is_recorded_without_clamping() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(10_000, admin)).await.unwrap();

    let (paid, status) = ledger
        .record_pledge_payment(payment(pledge_id, 15_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(paid, 15_000);
    assert_eq!(status, PledgeStatus::Paid);

    let pledge = ledger.pledge(pledge_id).await.unwrap();
    assert_eq!(pledge.paid_amount_minor, 15_000);
}

#[tokio::test]
async fn deleting_a_paid_pledge_reverses_the_whole_paid_amount() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(20_000, admin)).await.unwrap();

    ledger
        .record_pledge_payment(payment(pledge_id, 12_000, account_id, admin))
        .await
        .unwrap();
    ledger
        .record_pledge_payment(payment(pledge_id, 8_000, account_id, admin))
        .await
        .unwrap();

    ledger.delete_pledge(pledge_id, admin).await.unwrap();

    // one collapsed debit for the full 200.00, not one per payment
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 0);

    let entries = ledger.entries_for_account(account_id, 10).await.unwrap();
    let reversals: Vec<_> = entries
        .iter()
        .filter(|e| e.kind.is_debit() && e.source == Some(EntrySource::Pledge(pledge_id)))
        .collect();
    assert_eq!(reversals.len(), 1);
    assert_eq!(reversals[0].amount_minor, 20_000);

    let err = ledger.pledge(pledge_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn deleting_an_unpaid_pledge_posts_nothing() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(20_000, admin)).await.unwrap();

    ledger.delete_pledge(pledge_id, admin).await.unwrap();

    assert!(ledger
        .entries_for_account(account_id, 10)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn raising_the_amount_reopens_a_paid_pledge() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(10_000, admin)).await.unwrap();

    ledger
        .record_pledge_payment(payment(pledge_id, 10_000, account_id, admin))
        .await
        .unwrap();
    assert_eq!(
        ledger.pledge(pledge_id).await.unwrap().status,
        PledgeStatus::Paid
    );

    ledger
        .update_pledge(
            pledge_id,
            UpdatePledgeCmd {
                amount_minor: Some(15_000),
                ..Default::default()
            },
            admin,
        )
        .await
        .unwrap();

    let pledge = ledger.pledge(pledge_id).await.unwrap();
    assert_eq!(pledge.original_amount_minor, 15_000);
    assert_eq!(pledge.status, PledgeStatus::Active);
}

#[tokio::test]
async fn payments_must_land_on_a_receiving_account() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("petty box", 0, false, admin)
        .await
        .unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(10_000, admin)).await.unwrap();

    let err = ledger
        .record_pledge_payment(payment(pledge_id, 5_000, account_id, admin))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn pledge_payment_entries_cannot_be_edited_or_deleted() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger.create_account("till", 0, true, admin).await.unwrap();
    let pledge_id = ledger.create_pledge(pledge_of(10_000, admin)).await.unwrap();

    ledger
        .record_pledge_payment(payment(pledge_id, 5_000, account_id, admin))
        .await
        .unwrap();

    let entries = ledger.entries_for_account(account_id, 10).await.unwrap();
    let posting = entries
        .iter()
        .find(|e| e.source == Some(EntrySource::Pledge(pledge_id)))
        .unwrap();

    let err = ledger.delete_entry(posting.id, admin).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    let err = ledger
        .update_entry(ledger::UpdateEntryCmd::new(posting.id, admin).amount_minor(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}
