//! Command structs for ledger operations.
//!
//! These types bundle the parameters of the write operations, keeping call
//! sites readable and avoiding long argument lists. Optional fields come with
//! builder-style setters.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Debtor, EntryKind};

/// Post a new Income / Expenditure / PettyCash entry.
#[derive(Clone, Debug)]
pub struct PostEntryCmd {
    pub kind: EntryKind,
    pub account_id: Uuid,
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    pub label: String,
    pub actor_id: Uuid,
}

/// Edit an existing entry. `None` fields are left unchanged.
#[derive(Clone, Debug)]
pub struct UpdateEntryCmd {
    pub entry_id: Uuid,
    pub amount_minor: Option<i64>,
    pub account_id: Option<Uuid>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub label: Option<String>,
    pub actor_id: Uuid,
}

impl UpdateEntryCmd {
    #[must_use]
    pub fn new(entry_id: Uuid, actor_id: Uuid) -> Self {
        Self {
            entry_id,
            amount_minor: None,
            account_id: None,
            occurred_at: None,
            label: None,
            actor_id,
        }
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn account_id(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Create a pledge. A pledge is a promise, not a posting: no balance effect.
#[derive(Clone, Debug)]
pub struct CreatePledgeCmd {
    pub member_id: String,
    pub project_id: String,
    pub amount_minor: i64,
    pub due_date: NaiveDate,
    pub comments: Option<String>,
    pub actor_id: Uuid,
}

/// Edit the non-payment fields of a pledge.
#[derive(Clone, Debug, Default)]
pub struct UpdatePledgeCmd {
    pub amount_minor: Option<i64>,
    pub due_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

/// Record a payment against a pledge.
#[derive(Clone, Debug)]
pub struct RecordPledgePaymentCmd {
    pub pledge_id: Uuid,
    pub amount_minor: i64,
    pub account_id: Uuid,
    pub paid_at: DateTime<Utc>,
    pub actor_id: Uuid,
}

/// Create a debt, independent or linked to a sale.
#[derive(Clone, Debug)]
pub struct CreateDebtCmd {
    pub debtor: Debtor,
    pub description: String,
    /// Ignored (and cross-checked) when `sale_id` is set: a sale-linked
    /// debt's amount is derived from the sale's item subtotals.
    pub original_amount_minor: i64,
    pub due_date: NaiveDate,
    pub notes: Option<String>,
    pub sale_id: Option<Uuid>,
    pub actor_id: Uuid,
}

impl CreateDebtCmd {
    #[must_use]
    pub fn new(
        debtor: Debtor,
        description: impl Into<String>,
        original_amount_minor: i64,
        due_date: NaiveDate,
        actor_id: Uuid,
    ) -> Self {
        Self {
            debtor,
            description: description.into(),
            original_amount_minor,
            due_date,
            notes: None,
            sale_id: None,
            actor_id,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn sale_id(mut self, sale_id: Uuid) -> Self {
        self.sale_id = Some(sale_id);
        self
    }
}

/// Record a payment against a debt.
#[derive(Clone, Debug)]
pub struct RecordDebtPaymentCmd {
    pub debt_id: Uuid,
    pub amount_minor: i64,
    pub paid_at: DateTime<Utc>,
    pub method: String,
    pub account_id: Uuid,
    pub notes: Option<String>,
    pub actor_id: Uuid,
}

/// One requested line of a sale. When `unit_price_minor` is `None` the
/// product's list price applies.
#[derive(Clone, Debug)]
pub struct SaleLine {
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price_minor: Option<i64>,
}

/// Record a multi-line sale.
#[derive(Clone, Debug)]
pub struct RecordSaleCmd {
    pub customer_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub payment_method: String,
    pub account_id: Uuid,
    pub notes: Option<String>,
    pub items: Vec<SaleLine>,
    /// When false the sale total is not posted; the caller is expected to
    /// create a linked debt for the deferred amount.
    pub settled: bool,
    pub actor_id: Uuid,
}

impl RecordSaleCmd {
    #[must_use]
    pub fn new(
        account_id: Uuid,
        payment_method: impl Into<String>,
        occurred_at: DateTime<Utc>,
        actor_id: Uuid,
    ) -> Self {
        Self {
            customer_name: None,
            occurred_at,
            payment_method: payment_method.into(),
            account_id,
            notes: None,
            items: Vec::new(),
            settled: true,
            actor_id,
        }
    }

    #[must_use]
    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn item(mut self, product_id: Uuid, quantity: i64) -> Self {
        self.items.push(SaleLine {
            product_id,
            quantity,
            unit_price_minor: None,
        });
        self
    }

    #[must_use]
    pub fn item_priced(mut self, product_id: Uuid, quantity: i64, unit_price_minor: i64) -> Self {
        self.items.push(SaleLine {
            product_id,
            quantity,
            unit_price_minor: Some(unit_price_minor),
        });
        self
    }

    #[must_use]
    pub fn unsettled(mut self) -> Self {
        self.settled = false;
        self
    }
}
