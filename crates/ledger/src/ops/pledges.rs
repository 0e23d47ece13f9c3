//! Pledge lifecycle: create, edit, record payments, delete with reversal.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreatePledgeCmd, Entry, EntryKind, EntrySource, LedgerError, Pledge, PledgeStatus,
    RecordPledgePaymentCmd, ResultLedger, UpdatePledgeCmd, entries, pledges,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

impl Ledger {
    pub(super) async fn require_pledge(
        &self,
        db_tx: &DatabaseTransaction,
        pledge_id: Uuid,
    ) -> ResultLedger<Pledge> {
        let model = pledges::Entity::find_by_id(pledge_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("pledge {pledge_id}")))?;
        Pledge::try_from(model)
    }

    /// Create a pledge. A pledge is a promise, not a posting: no account is
    /// touched until a payment is recorded.
    pub async fn create_pledge(&self, cmd: CreatePledgeCmd) -> ResultLedger<Uuid> {
        let member_id = normalize_required_text(&cmd.member_id, "member reference")?;
        let project_id = normalize_required_text(&cmd.project_id, "project reference")?;
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;
            let pledge = Pledge::new(
                member_id,
                project_id,
                cmd.amount_minor,
                cmd.due_date,
                normalize_optional_text(cmd.comments.as_deref()),
                actor.id,
            )?;
            pledges::ActiveModel::from(&pledge).insert(&db_tx).await?;
            Ok(pledge.id)
        })
    }

    /// Edit the non-payment fields of a pledge. No balance effect; the
    /// status is re-derived so Paid-iff-covered keeps holding when the
    /// original amount changes.
    pub async fn update_pledge(
        &self,
        pledge_id: Uuid,
        cmd: UpdatePledgeCmd,
        actor_id: Uuid,
    ) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_writer(&db_tx, actor_id).await?;
            let pledge = self.require_pledge(&db_tx, pledge_id).await?;

            let new_amount = cmd.amount_minor.unwrap_or(pledge.original_amount_minor);
            if new_amount <= 0 {
                return Err(LedgerError::InvalidAmount(
                    "pledge amount must be > 0".to_string(),
                ));
            }
            let status = PledgeStatus::derive(pledge.paid_amount_minor, new_amount);

            let active = pledges::ActiveModel {
                id: ActiveValue::Set(pledge_id.to_string()),
                original_amount_minor: ActiveValue::Set(new_amount),
                due_date: ActiveValue::Set(cmd.due_date.unwrap_or(pledge.due_date)),
                comments: ActiveValue::Set(match cmd.comments.as_deref() {
                    Some(comments) => normalize_optional_text(Some(comments)),
                    None => pledge.comments,
                }),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Record a payment against a pledge.
    ///
    /// Atomically raises `paid_amount`, re-derives the status and posts an
    /// Income credit to the receiving account. Overpayment is not clamped;
    /// any positive amount is accepted and `paid_amount` may exceed the
    /// original.
    pub async fn record_pledge_payment(
        &self,
        cmd: RecordPledgePaymentCmd,
    ) -> ResultLedger<(i64, PledgeStatus)> {
        if cmd.amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "payment amount must be > 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;
            let pledge = self.require_pledge(&db_tx, cmd.pledge_id).await?;
            self.require_receiving_account(&db_tx, cmd.account_id)
                .await?;

            let new_paid = pledge.paid_amount_minor + cmd.amount_minor;
            let status = PledgeStatus::derive(new_paid, pledge.original_amount_minor);

            let mut entry = Entry::new(
                EntryKind::Income,
                cmd.account_id,
                cmd.amount_minor,
                cmd.paid_at,
                format!(
                    "pledge payment from {} for {}",
                    pledge.member_id, pledge.project_id
                ),
                actor.id,
            )?;
            entry.source = Some(EntrySource::Pledge(pledge.id));
            self.insert_posting(&db_tx, &entry).await?;

            let active = pledges::ActiveModel {
                id: ActiveValue::Set(pledge.id.to_string()),
                paid_amount_minor: ActiveValue::Set(new_paid),
                status: ActiveValue::Set(status.as_str().to_string()),
                last_payment_account_id: ActiveValue::Set(Some(cmd.account_id.to_string())),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            Ok((new_paid, status))
        })
    }

    /// Delete a pledge.
    ///
    /// With no recorded payments this is a plain delete. With payments, the
    /// whole paid amount is reversed first, as a single collapsed debit
    /// against the most recent receiving account rather than one debit per
    /// payment. One atomic operation: a partial run would desynchronize the
    /// account balance from the pledge.
    pub async fn delete_pledge(&self, pledge_id: Uuid, actor_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, actor_id).await?;
            let pledge = self.require_pledge(&db_tx, pledge_id).await?;

            if pledge.paid_amount_minor > 0 {
                let account_id = pledge.last_payment_account_id.ok_or_else(|| {
                    LedgerError::InconsistentState(format!(
                        "pledge {pledge_id} has paid amount {} but no recorded receiving account",
                        pledge.paid_amount_minor
                    ))
                })?;

                let mut reversal = Entry::new(
                    EntryKind::Expenditure,
                    account_id,
                    pledge.paid_amount_minor,
                    chrono::Utc::now(),
                    format!(
                        "reversal of deleted pledge from {} for {}",
                        pledge.member_id, pledge.project_id
                    ),
                    actor.id,
                )?;
                reversal.source = Some(EntrySource::Pledge(pledge.id));
                // Reversals bypass the funds pre-check: undoing a credit must
                // succeed even if the account has been spent below it since.
                entries::ActiveModel::from(&reversal).insert(&db_tx).await?;
                self.apply_account_delta(&db_tx, account_id, -pledge.paid_amount_minor)
                    .await?;
            }

            pledges::Entity::delete_by_id(pledge_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Return a pledge snapshot.
    pub async fn pledge(&self, pledge_id: Uuid) -> ResultLedger<Pledge> {
        with_tx!(self, |db_tx| self.require_pledge(&db_tx, pledge_id).await)
    }
}
