use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use ledger::{EntryKind, Ledger, LedgerError, PostEntryCmd, ProfileRole};
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

fn income(account_id: Uuid, amount_minor: i64, actor_id: Uuid) -> PostEntryCmd {
    PostEntryCmd {
        kind: EntryKind::Income,
        account_id,
        amount_minor,
        occurred_at: Utc::now(),
        label: "donation".to_string(),
        actor_id,
    }
}

async fn tamper_balance(db: &DatabaseConnection, account_id: Uuid, balance_minor: i64) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE accounts SET current_balance_minor = ? WHERE id = ?",
        vec![balance_minor.into(), account_id.to_string().into()],
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn audit_is_clean_after_normal_operations() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();
    ledger.post_entry(income(account_id, 5_000, admin)).await.unwrap();

    assert!(ledger.audit_balances().await.unwrap().is_empty());
}

#[tokio::test]
async fn audit_flags_a_tampered_balance_and_recompute_repairs_it() {
    let (ledger, db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();
    ledger.post_entry(income(account_id, 5_000, admin)).await.unwrap();

    tamper_balance(&db, account_id, 99_999).await;

    let drifted = ledger.audit_balances().await.unwrap();
    assert_eq!(drifted.len(), 1);
    assert_eq!(drifted[0].account_id, account_id);
    assert_eq!(drifted[0].stored_minor, 99_999);
    assert_eq!(drifted[0].computed_minor, 15_000);
    assert_eq!(drifted[0].delta_minor(), 99_999 - 15_000);

    ledger.recompute_balances().await.unwrap();
    assert!(ledger.audit_balances().await.unwrap().is_empty());
    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 15_000);
}

#[tokio::test]
async fn initialize_balance_absorbs_the_difference_in_one_marker() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();
    ledger.post_entry(income(account_id, 5_000, admin)).await.unwrap();

    ledger
        .initialize_balance(account_id, 40_000, admin)
        .await
        .unwrap();

    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 40_000);
    // replaying the ledger agrees with the stored figure
    assert!(ledger.audit_balances().await.unwrap().is_empty());

    let entries = ledger.entries_for_account(account_id, 50).await.unwrap();
    let markers: Vec<_> = entries.iter().filter(|e| e.init_marker).collect();
    assert_eq!(markers.len(), 1);
    // 40000 = 10000 initial + 5000 posted + 25000 marker
    assert_eq!(markers[0].signed_amount_minor(), 25_000);
}

#[tokio::test]
async fn reinitializing_updates_the_marker_instead_of_stacking() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();

    ledger
        .initialize_balance(account_id, 40_000, admin)
        .await
        .unwrap();
    ledger
        .initialize_balance(account_id, 2_000, admin)
        .await
        .unwrap();

    let account = ledger.account(account_id).await.unwrap();
    assert_eq!(account.current_balance_minor, 2_000);
    assert!(ledger.audit_balances().await.unwrap().is_empty());

    let entries = ledger.entries_for_account(account_id, 50).await.unwrap();
    let markers: Vec<_> = entries.iter().filter(|e| e.init_marker).collect();
    assert_eq!(markers.len(), 1);
    // 2000 = 10000 initial - 8000 marker
    assert_eq!(markers[0].signed_amount_minor(), -8_000);
    assert_eq!(markers[0].kind, EntryKind::Expenditure);
}

#[tokio::test]
async fn only_admins_may_initialize_balances() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let treasurer = ledger
        .create_profile("bob", ProfileRole::Treasurer)
        .await
        .unwrap();
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();

    let err = ledger
        .initialize_balance(account_id, 50_000, treasurer)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Forbidden(_)));
}

#[tokio::test]
async fn marker_entries_cannot_be_edited() {
    let (ledger, _db, admin) = ledger_with_db().await;
    let account_id = ledger
        .create_account("till", 10_000, true, admin)
        .await
        .unwrap();
    ledger
        .initialize_balance(account_id, 40_000, admin)
        .await
        .unwrap();

    let entries = ledger.entries_for_account(account_id, 50).await.unwrap();
    let marker = entries.iter().find(|e| e.init_marker).unwrap();

    let err = ledger
        .update_entry(ledger::UpdateEntryCmd::new(marker.id, admin).amount_minor(1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));

    let err = ledger.delete_entry(marker.id, admin).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
}
