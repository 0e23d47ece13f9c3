//! Balance-consistent treasury ledger for Obolo.
//!
//! The crate owns financial accounts, typed ledger entries, pledges, debts,
//! products and sales, and keeps them mutually consistent: every operation
//! that moves money runs as one database transaction and funnels its balance
//! effect through a single choke point, so
//! `current_balance == initial_balance + Σ signed postings`
//! stays a checkable invariant (see `Ledger::audit_balances`).

pub use accounts::Account;
pub use commands::{
    CreateDebtCmd, CreatePledgeCmd, PostEntryCmd, RecordDebtPaymentCmd, RecordPledgePaymentCmd,
    RecordSaleCmd, SaleLine, UpdateEntryCmd, UpdatePledgeCmd,
};
pub use debt_payments::DebtPayment;
pub use debts::{Debt, DebtStatus, Debtor};
pub use entries::{Entry, EntryKind, EntrySource};
pub use error::LedgerError;
pub use money::Money;
pub use ops::{AccountDrift, Ledger, LedgerBuilder};
pub use pledges::{Pledge, PledgeStatus};
pub use products::Product;
pub use profiles::{Profile, ProfileRole};
pub use sale_items::SaleItem;
pub use sales::Sale;

pub mod accounts;
mod commands;
pub mod debt_payments;
pub mod debts;
pub mod entries;
mod error;
mod money;
mod ops;
pub mod pledges;
pub mod products;
pub mod profiles;
pub mod sale_items;
pub mod sales;

type ResultLedger<T> = Result<T, LedgerError>;
