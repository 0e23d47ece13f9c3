//! Account operations: creation, snapshots, the balance choke point and the
//! administrative balance initializer.

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{Account, Entry, EntryKind, LedgerError, ResultLedger, accounts, entries};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    pub(super) async fn require_account(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultLedger<accounts::Model> {
        accounts::Entity::find_by_id(account_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))
    }

    /// Like [`require_account`], but also checks the payment flag. Pledge,
    /// debt and sale credits may only land on accounts that accept them.
    ///
    /// [`require_account`]: Ledger::require_account
    pub(super) async fn require_receiving_account(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
    ) -> ResultLedger<accounts::Model> {
        let model = self.require_account(db_tx, account_id).await?;
        if !model.can_receive_payments {
            return Err(LedgerError::InvalidAmount(format!(
                "account {account_id} cannot receive payments"
            )));
        }
        Ok(model)
    }

    /// The single choke point for balance mutations. Every posting, edit,
    /// deletion and reversal funnels its signed delta through here so the
    /// `current = initial + Σ postings` invariant stays auditable.
    ///
    /// Deliberately does not enforce non-negative balances; overspend checks
    /// belong to the posting callers.
    pub(super) async fn apply_account_delta(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        delta_minor: i64,
    ) -> ResultLedger<i64> {
        let model = self.require_account(db_tx, account_id).await?;
        let new_balance = model.current_balance_minor + delta_minor;
        let active = accounts::ActiveModel {
            id: ActiveValue::Set(account_id.to_string()),
            current_balance_minor: ActiveValue::Set(new_balance),
            ..Default::default()
        };
        active.update(db_tx).await?;
        Ok(new_balance)
    }

    /// Create a financial account owned by the acting profile.
    pub async fn create_account(
        &self,
        name: &str,
        initial_balance_minor: i64,
        can_receive_payments: bool,
        actor_id: Uuid,
    ) -> ResultLedger<Uuid> {
        let name = normalize_required_text(name, "account name")?;
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, actor_id).await?;
            let account = Account::new(name, actor.id, initial_balance_minor, can_receive_payments);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account.id)
        })
    }

    /// Return an account snapshot.
    pub async fn account(&self, account_id: Uuid) -> ResultLedger<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id).await?;
            Account::try_from(model)
        })
    }

    /// Return all accounts.
    pub async fn accounts(&self) -> ResultLedger<Vec<Account>> {
        with_tx!(self, |db_tx| {
            let models = accounts::Entity::find().all(&db_tx).await?;
            models.into_iter().map(Account::try_from).collect()
        })
    }

    /// Administrative balance reset.
    ///
    /// Sets `current_balance` to `new_balance_minor` directly (bypassing the
    /// delta choke point) and upserts the single synthetic initialization
    /// marker entry for the account, sized so that recomputing the balance
    /// from the ledger yields exactly the new balance. Repeated calls update
    /// the existing marker instead of stacking new ones.
    pub async fn initialize_balance(
        &self,
        account_id: Uuid,
        new_balance_minor: i64,
        actor_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let actor = self.require_admin(&db_tx, actor_id).await?;
            let account = self.require_account(&db_tx, account_id).await?;

            // Signed sum of everything already posted, marker excluded.
            let other_models = entries::Entity::find()
                .filter(entries::Column::AccountId.eq(account_id.to_string()))
                .filter(entries::Column::InitMarker.eq(false))
                .all(&db_tx)
                .await?;
            let mut posted_minor = 0i64;
            for model in other_models {
                let entry = Entry::try_from(model)?;
                posted_minor += entry.signed_amount_minor();
            }

            let marker_signed =
                new_balance_minor - account.initial_balance_minor - posted_minor;
            let (kind, amount) = if marker_signed >= 0 {
                (EntryKind::Income, marker_signed)
            } else {
                (EntryKind::Expenditure, -marker_signed)
            };

            let existing = entries::Entity::find()
                .filter(entries::Column::AccountId.eq(account_id.to_string()))
                .filter(entries::Column::InitMarker.eq(true))
                .one(&db_tx)
                .await?;
            match existing {
                Some(model) => {
                    let active = entries::ActiveModel {
                        id: ActiveValue::Set(model.id),
                        kind: ActiveValue::Set(kind.as_str().to_string()),
                        amount_minor: ActiveValue::Set(amount),
                        occurred_at: ActiveValue::Set(Utc::now()),
                        created_by: ActiveValue::Set(actor.id.to_string()),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                }
                None => {
                    // The marker is synthetic; a zero amount is allowed here
                    // even though regular postings require amount > 0.
                    let marker = Entry {
                        id: Uuid::new_v4(),
                        kind,
                        account_id,
                        amount_minor: amount,
                        occurred_at: Utc::now(),
                        label: "balance initialization".to_string(),
                        created_by: actor.id,
                        init_marker: true,
                        source: None,
                    };
                    entries::ActiveModel::from(&marker).insert(&db_tx).await?;
                }
            }

            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::CurrentBalanceMinor,
                    Expr::value(new_balance_minor),
                )
                .filter(accounts::Column::Id.eq(account_id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
