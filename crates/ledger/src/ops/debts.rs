//! Debt lifecycle: create (independent or sale-linked), record payments,
//! delete when unpaid.

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CreateDebtCmd, Debt, DebtPayment, DebtStatus, Entry, EntryKind, EntrySource, LedgerError,
    RecordDebtPaymentCmd, ResultLedger, debt_payments, debts, sale_items, sales,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

impl Ledger {
    pub(super) async fn require_debt(
        &self,
        db_tx: &DatabaseTransaction,
        debt_id: Uuid,
    ) -> ResultLedger<Debt> {
        let model = debts::Entity::find_by_id(debt_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("debt {debt_id}")))?;
        Debt::try_from(model)
    }

    /// Sum of a sale's item subtotals; a sale-linked debt's amount is derived
    /// from this, never entered independently.
    async fn sale_items_total(
        &self,
        db_tx: &DatabaseTransaction,
        sale_id: Uuid,
    ) -> ResultLedger<i64> {
        sales::Entity::find_by_id(sale_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("sale {sale_id}")))?;
        let items = sale_items::Entity::find()
            .filter(sale_items::Column::SaleId.eq(sale_id.to_string()))
            .all(db_tx)
            .await?;
        Ok(items.iter().map(|item| item.subtotal_minor).sum())
    }

    /// Create a debt. Exactly one of member/customer is enforced by the
    /// [`Debtor`] type at the API boundary; an empty reference is rejected
    /// here. A `sale_id` links the debt to the sale that deferred payment.
    ///
    /// [`Debtor`]: crate::Debtor
    pub async fn create_debt(&self, cmd: CreateDebtCmd) -> ResultLedger<Uuid> {
        let description = normalize_required_text(&cmd.description, "debt description")?;
        let debtor = match &cmd.debtor {
            crate::Debtor::Member(id) => {
                crate::Debtor::Member(normalize_required_text(id, "debtor member reference")?)
            }
            crate::Debtor::Customer(name) => {
                crate::Debtor::Customer(normalize_required_text(name, "customer name")?)
            }
        };
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;

            let original_amount_minor = match cmd.sale_id {
                Some(sale_id) => {
                    let total = self.sale_items_total(&db_tx, sale_id).await?;
                    if cmd.original_amount_minor != 0 && cmd.original_amount_minor != total {
                        return Err(LedgerError::InvalidAmount(format!(
                            "debt amount {} does not match sale total {total}",
                            cmd.original_amount_minor
                        )));
                    }
                    total
                }
                None => cmd.original_amount_minor,
            };

            let mut debt = Debt::new(
                debtor,
                description,
                original_amount_minor,
                cmd.due_date,
                normalize_optional_text(cmd.notes.as_deref()),
                actor.id,
            )?;
            debt.sale_id = cmd.sale_id;
            debts::ActiveModel::from(&debt).insert(&db_tx).await?;
            Ok(debt.id)
        })
    }

    /// Record a payment against a debt.
    ///
    /// Four steps, one transaction: insert the immutable payment row, lower
    /// `amount_due`, re-derive the status, post the Income credit.
    pub async fn record_debt_payment(
        &self,
        cmd: RecordDebtPaymentCmd,
    ) -> ResultLedger<(i64, DebtStatus)> {
        if cmd.amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "payment amount must be > 0".to_string(),
            ));
        }
        let method = normalize_required_text(&cmd.method, "payment method")?;
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;
            let debt = self.require_debt(&db_tx, cmd.debt_id).await?;
            self.require_receiving_account(&db_tx, cmd.account_id)
                .await?;

            if cmd.amount_minor > debt.amount_due_minor {
                return Err(LedgerError::AmountExceedsDue(format!(
                    "payment {} exceeds amount due {}",
                    cmd.amount_minor, debt.amount_due_minor
                )));
            }

            let new_due = debt.amount_due_minor - cmd.amount_minor;
            let status = DebtStatus::derive(new_due, debt.original_amount_minor);

            let payment = DebtPayment {
                id: Uuid::new_v4(),
                debt_id: debt.id,
                amount_minor: cmd.amount_minor,
                paid_at: cmd.paid_at,
                method,
                account_id: cmd.account_id,
                notes: normalize_optional_text(cmd.notes.as_deref()),
                created_by: actor.id,
            };
            debt_payments::ActiveModel::from(&payment)
                .insert(&db_tx)
                .await?;

            let mut entry = Entry::new(
                EntryKind::Income,
                cmd.account_id,
                cmd.amount_minor,
                cmd.paid_at,
                format!("debt payment: {}", debt.description),
                actor.id,
            )?;
            entry.source = Some(EntrySource::Debt(debt.id));
            self.insert_posting(&db_tx, &entry).await?;

            let active = debts::ActiveModel {
                id: ActiveValue::Set(debt.id.to_string()),
                amount_due_minor: ActiveValue::Set(new_due),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            Ok((new_due, status))
        })
    }

    /// Delete a debt. Blocked while any payment rows reference it: payments
    /// are never reversed automatically, so a debt with history has to stay
    /// visible to the operator.
    pub async fn delete_debt(&self, debt_id: Uuid, actor_id: Uuid) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            self.require_writer(&db_tx, actor_id).await?;
            self.require_debt(&db_tx, debt_id).await?;

            let has_payments = debt_payments::Entity::find()
                .filter(debt_payments::Column::DebtId.eq(debt_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if has_payments {
                return Err(LedgerError::HasPayments(format!(
                    "debt {debt_id} has recorded payments and cannot be deleted"
                )));
            }

            debts::Entity::delete_by_id(debt_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Return a debt snapshot.
    pub async fn debt(&self, debt_id: Uuid) -> ResultLedger<Debt> {
        with_tx!(self, |db_tx| self.require_debt(&db_tx, debt_id).await)
    }

    /// Payments recorded against a debt, for audit display.
    pub async fn debt_payments(&self, debt_id: Uuid) -> ResultLedger<Vec<DebtPayment>> {
        with_tx!(self, |db_tx| {
            self.require_debt(&db_tx, debt_id).await?;
            let models = debt_payments::Entity::find()
                .filter(debt_payments::Column::DebtId.eq(debt_id.to_string()))
                .all(&db_tx)
                .await?;
            models.into_iter().map(DebtPayment::try_from).collect()
        })
    }
}
