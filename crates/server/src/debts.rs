//! Debt API endpoints

use api_types::debt::{DebtCreated, DebtDelete, DebtNew, DebtPaymentNew, DebtPaymentRecorded};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use ledger::{CreateDebtCmd, Debtor, RecordDebtPaymentCmd};

pub(crate) fn debtor_from_parts(
    debtor_member_id: Option<String>,
    customer_name: Option<String>,
) -> Result<Debtor, ServerError> {
    match (debtor_member_id, customer_name) {
        (Some(member), None) => Ok(Debtor::Member(member)),
        (None, Some(customer)) => Ok(Debtor::Customer(customer)),
        _ => Err(ServerError::Generic(
            "exactly one of debtor_member_id or customer_name required".to_string(),
        )),
    }
}

pub async fn debt_new(
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<Json<DebtCreated>, ServerError> {
    let debtor = debtor_from_parts(payload.debtor_member_id, payload.customer_name)?;

    let mut cmd = CreateDebtCmd::new(
        debtor,
        payload.description,
        payload.amount_minor,
        payload.due_date,
        payload.actor_id,
    );
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }
    if let Some(sale_id) = payload.sale_id {
        cmd = cmd.sale_id(sale_id);
    }

    let id = state.ledger.create_debt(cmd).await?;
    Ok(Json(DebtCreated { id }))
}

pub async fn payment_new(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtPaymentNew>,
) -> Result<Json<DebtPaymentRecorded>, ServerError> {
    let (amount_due_minor, status) = state
        .ledger
        .record_debt_payment(RecordDebtPaymentCmd {
            debt_id: id,
            amount_minor: payload.amount_minor,
            paid_at: payload.paid_at,
            method: payload.method,
            account_id: payload.account_id,
            notes: payload.notes,
            actor_id: payload.actor_id,
        })
        .await?;

    Ok(Json(DebtPaymentRecorded {
        amount_due_minor,
        status: status.as_str().to_string(),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtDelete>,
) -> Result<(), ServerError> {
    state.ledger.delete_debt(id, payload.actor_id).await?;
    Ok(())
}
