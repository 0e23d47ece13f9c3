//! Posting, editing and deleting ledger entries.
//!
//! Income, Expenditure and Petty Cash flows all use these three operations;
//! they differ only in the sign carried by [`EntryKind`].
//!
//! [`EntryKind`]: crate::EntryKind

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{Entry, LedgerError, PostEntryCmd, ResultLedger, UpdateEntryCmd, entries};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    pub(super) async fn require_entry(
        &self,
        db_tx: &DatabaseTransaction,
        entry_id: Uuid,
    ) -> ResultLedger<Entry> {
        let model = entries::Entity::find_by_id(entry_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("entry {entry_id}")))?;
        Entry::try_from(model)
    }

    /// Sufficient-funds pre-check for debit postings. `available_minor` is
    /// the balance the entry would draw from; credits never check.
    fn check_funds(entry_kind_debit: bool, amount_minor: i64, available_minor: i64) -> ResultLedger<()> {
        if entry_kind_debit && amount_minor > available_minor {
            return Err(LedgerError::InsufficientFunds(format!(
                "amount {amount_minor} exceeds available balance {available_minor}"
            )));
        }
        Ok(())
    }

    /// Insert a posting row and funnel its signed amount through the balance
    /// choke point. Shared by plain postings and by the pledge/debt/sale
    /// engines (which attach a source reference beforehand).
    pub(super) async fn insert_posting(
        &self,
        db_tx: &DatabaseTransaction,
        entry: &Entry,
    ) -> ResultLedger<()> {
        entries::ActiveModel::from(entry).insert(db_tx).await?;
        self.apply_account_delta(db_tx, entry.account_id, entry.signed_amount_minor())
            .await?;
        Ok(())
    }

    /// Post a new ledger entry.
    ///
    /// Validates `amount > 0`; for debit kinds the account balance must cover
    /// the amount. On success the row is inserted and the account receives
    /// the signed delta, all in one transaction.
    pub async fn post_entry(&self, cmd: PostEntryCmd) -> ResultLedger<Uuid> {
        let label = normalize_required_text(&cmd.label, "entry label")?;
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;
            let account = self.require_account(&db_tx, cmd.account_id).await?;

            let entry = Entry::new(
                cmd.kind,
                cmd.account_id,
                cmd.amount_minor,
                cmd.occurred_at,
                label,
                actor.id,
            )?;
            Self::check_funds(
                cmd.kind.is_debit(),
                cmd.amount_minor,
                account.current_balance_minor,
            )?;

            self.insert_posting(&db_tx, &entry).await?;
            Ok(entry.id)
        })
    }

    /// Edit an existing entry.
    ///
    /// Two deltas are computed: the reversal of the old posting and the new
    /// posting. When the account changes the reversal hits the old account
    /// and the posting the new one; neither delta is ever dropped.
    pub async fn update_entry(&self, cmd: UpdateEntryCmd) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_writer(&db_tx, cmd.actor_id).await?;
            let old = self.require_entry(&db_tx, cmd.entry_id).await?;
            if old.source.is_some() {
                return Err(LedgerError::InvalidAmount(
                    "payment postings are immutable".to_string(),
                ));
            }
            if old.init_marker {
                return Err(LedgerError::InvalidAmount(
                    "the initialization marker cannot be edited".to_string(),
                ));
            }

            let new_amount = cmd.amount_minor.unwrap_or(old.amount_minor);
            if new_amount <= 0 {
                return Err(LedgerError::InvalidAmount(
                    "amount_minor must be > 0".to_string(),
                ));
            }
            let new_account_id = cmd.account_id.unwrap_or(old.account_id);
            let new_label = match cmd.label.as_deref() {
                Some(label) => normalize_required_text(label, "entry label")?,
                None => old.label.clone(),
            };

            let old_signed = old.signed_amount_minor();
            let new_signed = old.kind.sign() * new_amount;

            if new_account_id == old.account_id {
                // The balance freed by reversing the old posting is available
                // to the new one.
                let account = self.require_account(&db_tx, old.account_id).await?;
                Self::check_funds(
                    old.kind.is_debit(),
                    new_amount,
                    account.current_balance_minor - old_signed,
                )?;
            } else {
                let target = self.require_account(&db_tx, new_account_id).await?;
                Self::check_funds(old.kind.is_debit(), new_amount, target.current_balance_minor)?;
            }

            let active = entries::ActiveModel {
                id: ActiveValue::Set(old.id.to_string()),
                amount_minor: ActiveValue::Set(new_amount),
                account_id: ActiveValue::Set(new_account_id.to_string()),
                occurred_at: ActiveValue::Set(cmd.occurred_at.unwrap_or(old.occurred_at)),
                label: ActiveValue::Set(new_label),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            if new_account_id == old.account_id {
                self.apply_account_delta(&db_tx, old.account_id, new_signed - old_signed)
                    .await?;
            } else {
                self.apply_account_delta(&db_tx, old.account_id, -old_signed)
                    .await?;
                self.apply_account_delta(&db_tx, new_account_id, new_signed)
                    .await?;
            }
            Ok(())
        })
    }

    /// Delete an entry, applying the exact inverse of its posting first.
    pub async fn delete_entry(&self, entry_id: Uuid, actor_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_writer(&db_tx, actor_id).await?;
            let entry = self.require_entry(&db_tx, entry_id).await?;
            if entry.source.is_some() {
                return Err(LedgerError::InvalidAmount(
                    "payment postings are immutable".to_string(),
                ));
            }
            if entry.init_marker {
                return Err(LedgerError::InvalidAmount(
                    "the initialization marker cannot be deleted".to_string(),
                ));
            }

            self.apply_account_delta(&db_tx, entry.account_id, -entry.signed_amount_minor())
                .await?;
            entries::Entity::delete_by_id(entry_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Recent entries for one account, newest first.
    pub async fn entries_for_account(
        &self,
        account_id: Uuid,
        limit: u64,
    ) -> ResultLedger<Vec<Entry>> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id).await?;
            let models = entries::Entity::find()
                .filter(entries::Column::AccountId.eq(account_id.to_string()))
                .order_by_desc(entries::Column::OccurredAt)
                .limit(limit)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Entry::try_from).collect()
        })
    }
}
