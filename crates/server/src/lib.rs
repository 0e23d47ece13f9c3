use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod accounts;
mod debts;
mod entries;
mod pledges;
mod sales;
mod server;

pub mod types {
    pub mod entry {
        pub use api_types::entry::{EntryCreated, EntryDelete, EntryNew, EntryUpdate};
    }

    pub mod pledge {
        pub use api_types::pledge::{
            PledgeCreated, PledgeDelete, PledgeNew, PledgePaymentNew, PledgePaymentRecorded,
            PledgeUpdate,
        };
    }

    pub mod debt {
        pub use api_types::debt::{
            DebtCreated, DebtDelete, DebtNew, DebtPaymentNew, DebtPaymentRecorded,
        };
    }

    pub mod sale {
        pub use api_types::sale::{SaleCreated, SaleLine, SaleNew};
    }

    pub mod account {
        pub use api_types::account::{
            AccountDriftView, AccountNew, AccountView, AuditResponse, BalanceInitialize,
            BalanceInitialized,
        };
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Forbidden(_) => StatusCode::FORBIDDEN,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::HasPayments(_) => StatusCode::CONFLICT,
        LedgerError::Database(_) | LedgerError::InconsistentState(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        LedgerError::InvalidAmount(_)
        | LedgerError::InsufficientFunds(_)
        | LedgerError::InsufficientStock(_)
        | LedgerError::AmountExceedsDue(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        LedgerError::InconsistentState(detail) => {
            tracing::error!("inconsistent ledger state: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), message_for_ledger_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_maps_to_403() {
        let res = ServerError::from(LedgerError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn has_payments_maps_to_409() {
        let res = ServerError::from(LedgerError::HasPayments("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_maps_to_422() {
        let res = ServerError::from(LedgerError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn inconsistent_state_maps_to_500() {
        let res =
            ServerError::from(LedgerError::InconsistentState("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
