use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod entry {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EntryKind {
        Income,
        Expenditure,
        PettyCash,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryNew {
        pub kind: EntryKind,
        pub account_id: Uuid,
        /// Must be > 0. The kind defines the balance direction.
        pub amount_minor: i64,
        pub occurred_at: DateTime<Utc>,
        pub label: String,
        pub actor_id: Uuid,
    }

    /// Partial edit; absent fields are left unchanged.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryUpdate {
        pub amount_minor: Option<i64>,
        pub account_id: Option<Uuid>,
        pub occurred_at: Option<DateTime<Utc>>,
        pub label: Option<String>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryDelete {
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryCreated {
        pub id: Uuid,
    }
}

pub mod pledge {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeNew {
        pub member_id: String,
        pub project_id: String,
        pub amount_minor: i64,
        pub due_date: NaiveDate,
        pub comments: Option<String>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeUpdate {
        pub amount_minor: Option<i64>,
        pub due_date: Option<NaiveDate>,
        pub comments: Option<String>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgePaymentNew {
        pub amount_minor: i64,
        pub account_id: Uuid,
        pub paid_at: DateTime<Utc>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeDelete {
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgeCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PledgePaymentRecorded {
        pub paid_amount_minor: i64,
        pub status: String,
    }
}

pub mod debt {
    use super::*;

    /// Exactly one of `debtor_member_id` / `customer_name` must be set.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub debtor_member_id: Option<String>,
        pub customer_name: Option<String>,
        pub description: String,
        /// Ignored when `sale_id` is set; the amount then comes from the
        /// sale's item subtotals.
        pub amount_minor: i64,
        pub due_date: NaiveDate,
        pub notes: Option<String>,
        pub sale_id: Option<Uuid>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtPaymentNew {
        pub amount_minor: i64,
        pub paid_at: DateTime<Utc>,
        pub method: String,
        pub account_id: Uuid,
        pub notes: Option<String>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtDelete {
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtPaymentRecorded {
        pub amount_due_minor: i64,
        pub status: String,
    }
}

pub mod sale {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleLine {
        pub product_id: Uuid,
        pub quantity: i64,
        /// Overrides the product's list price when set.
        pub unit_price_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleNew {
        pub customer_name: Option<String>,
        pub occurred_at: DateTime<Utc>,
        pub payment_method: String,
        pub account_id: Uuid,
        pub notes: Option<String>,
        pub items: Vec<SaleLine>,
        /// When true, no money moves now: a debt for the full total is
        /// created against the customer, due on `credit_due_date`.
        #[serde(default)]
        pub on_credit: bool,
        pub credit_due_date: Option<NaiveDate>,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SaleCreated {
        pub id: Uuid,
        pub total_minor: i64,
        /// Set only for on-credit sales.
        pub debt_id: Option<Uuid>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub initial_balance_minor: i64,
        pub can_receive_payments: bool,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub current_balance_minor: i64,
        pub initial_balance_minor: i64,
        pub can_receive_payments: bool,
    }

    /// Set the account's live balance to an exact figure; the difference is
    /// absorbed by a single marker entry so replay still matches.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceInitialize {
        pub new_balance_minor: i64,
        pub actor_id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceInitialized {
        pub current_balance_minor: i64,
    }

    /// One row of the drift report: stored vs replayed balance.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountDriftView {
        pub account_id: Uuid,
        pub name: String,
        pub stored_minor: i64,
        pub computed_minor: i64,
        pub delta_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuditResponse {
        pub drifted: Vec<AccountDriftView>,
    }
}
