//! Balance reconciliation.
//!
//! The running balance is denormalized for read performance; these routines
//! recompute it from the ledger so drift can be detected in audits and tests
//! instead of being silently trusted.

use std::collections::HashMap;

use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Entry, ResultLedger, accounts, entries};

use super::{Ledger, with_tx};

/// One account whose stored balance disagrees with the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountDrift {
    pub account_id: Uuid,
    pub name: String,
    pub stored_minor: i64,
    pub computed_minor: i64,
}

impl AccountDrift {
    #[must_use]
    pub fn delta_minor(&self) -> i64 {
        self.stored_minor - self.computed_minor
    }
}

impl Ledger {
    async fn computed_balances(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
    ) -> ResultLedger<(Vec<accounts::Model>, HashMap<Uuid, i64>)> {
        let account_models = accounts::Entity::find().all(db_tx).await?;

        let mut computed: HashMap<Uuid, i64> = HashMap::new();
        for model in &account_models {
            if let Ok(id) = Uuid::parse_str(&model.id) {
                computed.insert(id, model.initial_balance_minor);
            }
        }

        let entry_models = entries::Entity::find().all(db_tx).await?;
        for model in entry_models {
            let entry = Entry::try_from(model)?;
            if let Some(balance) = computed.get_mut(&entry.account_id) {
                *balance += entry.signed_amount_minor();
            }
        }

        Ok((account_models, computed))
    }

    /// Compare every account's stored balance against
    /// `initial_balance + Σ signed postings` and report the ones that drift.
    /// An empty report means the core invariant holds.
    pub async fn audit_balances(&self) -> ResultLedger<Vec<AccountDrift>> {
        with_tx!(self, |db_tx| {
            let (account_models, computed) = self.computed_balances(&db_tx).await?;

            let mut drifts = Vec::new();
            for model in account_models {
                let Ok(id) = Uuid::parse_str(&model.id) else {
                    continue;
                };
                let computed_minor = computed.get(&id).copied().unwrap_or(0);
                if computed_minor != model.current_balance_minor {
                    drifts.push(AccountDrift {
                        account_id: id,
                        name: model.name,
                        stored_minor: model.current_balance_minor,
                        computed_minor,
                    });
                }
            }
            Ok(drifts)
        })
    }

    /// Rewrite every stored balance from the ledger. Repair tool for drift
    /// found by [`audit_balances`]; runs in one transaction.
    ///
    /// [`audit_balances`]: Ledger::audit_balances
    pub async fn recompute_balances(&self) -> ResultLedger<()> {
        with_tx!(self, |db_tx| {
            let (account_models, computed) = self.computed_balances(&db_tx).await?;

            for model in account_models {
                let Ok(id) = Uuid::parse_str(&model.id) else {
                    continue;
                };
                let computed_minor = computed.get(&id).copied().unwrap_or(0);
                if computed_minor != model.current_balance_minor {
                    let active = accounts::ActiveModel {
                        id: ActiveValue::Set(model.id),
                        current_balance_minor: ActiveValue::Set(computed_minor),
                        ..Default::default()
                    };
                    active.update(&db_tx).await?;
                }
            }
            Ok(())
        })
    }
}
