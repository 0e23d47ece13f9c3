//! Errors the ledger can return to callers.
//!
//! Validation errors are raised before any row is written; database errors
//! abort the surrounding transaction. [`InconsistentState`] is reserved for
//! situations the store could not roll back and an operator has to reconcile
//! by hand.
//!
//! [`InconsistentState`]: LedgerError::InconsistentState
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Amount exceeds amount due: {0}")]
    AmountExceedsDue(String),
    #[error("Debt has recorded payments: {0}")]
    HasPayments(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Inconsistent state, manual reconciliation required: {0}")]
    InconsistentState(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::AmountExceedsDue(a), Self::AmountExceedsDue(b)) => a == b,
            (Self::HasPayments(a), Self::HasPayments(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InconsistentState(a), Self::InconsistentState(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
