//! Account API endpoints

use api_types::account::{
    AccountDriftView, AccountNew, AccountView, AuditResponse, BalanceInitialize, BalanceInitialized,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

fn view(account: ledger::Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        current_balance_minor: account.current_balance_minor,
        initial_balance_minor: account.initial_balance_minor,
        can_receive_payments: account.can_receive_payments,
    }
}

pub async fn account_new(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<Json<AccountView>, ServerError> {
    let id = state
        .ledger
        .create_account(
            &payload.name,
            payload.initial_balance_minor,
            payload.can_receive_payments,
            payload.actor_id,
        )
        .await?;

    let account = state.ledger.account(id).await?;
    Ok(Json(view(account)))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state.ledger.account(id).await?;
    Ok(Json(view(account)))
}

pub async fn initialize(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BalanceInitialize>,
) -> Result<Json<BalanceInitialized>, ServerError> {
    state
        .ledger
        .initialize_balance(id, payload.new_balance_minor, payload.actor_id)
        .await?;

    let account = state.ledger.account(id).await?;
    Ok(Json(BalanceInitialized {
        current_balance_minor: account.current_balance_minor,
    }))
}

pub async fn audit(
    State(state): State<ServerState>,
) -> Result<Json<AuditResponse>, ServerError> {
    let drifted = state
        .ledger
        .audit_balances()
        .await?
        .into_iter()
        .map(|drift| AccountDriftView {
            account_id: drift.account_id,
            delta_minor: drift.delta_minor(),
            name: drift.name,
            stored_minor: drift.stored_minor,
            computed_minor: drift.computed_minor,
        })
        .collect();

    Ok(Json(AuditResponse { drifted }))
}
