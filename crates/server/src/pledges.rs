//! Pledge API endpoints

use api_types::pledge::{
    PledgeCreated, PledgeDelete, PledgeNew, PledgePaymentNew, PledgePaymentRecorded, PledgeUpdate,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use ledger::{CreatePledgeCmd, RecordPledgePaymentCmd, UpdatePledgeCmd};

pub async fn pledge_new(
    State(state): State<ServerState>,
    Json(payload): Json<PledgeNew>,
) -> Result<Json<PledgeCreated>, ServerError> {
    let id = state
        .ledger
        .create_pledge(CreatePledgeCmd {
            member_id: payload.member_id,
            project_id: payload.project_id,
            amount_minor: payload.amount_minor,
            due_date: payload.due_date,
            comments: payload.comments,
            actor_id: payload.actor_id,
        })
        .await?;

    Ok(Json(PledgeCreated { id }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PledgeUpdate>,
) -> Result<(), ServerError> {
    let cmd = UpdatePledgeCmd {
        amount_minor: payload.amount_minor,
        due_date: payload.due_date,
        comments: payload.comments,
    };
    state.ledger.update_pledge(id, cmd, payload.actor_id).await?;
    Ok(())
}

pub async fn payment_new(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PledgePaymentNew>,
) -> Result<Json<PledgePaymentRecorded>, ServerError> {
    let (paid_amount_minor, status) = state
        .ledger
        .record_pledge_payment(RecordPledgePaymentCmd {
            pledge_id: id,
            amount_minor: payload.amount_minor,
            account_id: payload.account_id,
            paid_at: payload.paid_at,
            actor_id: payload.actor_id,
        })
        .await?;

    Ok(Json(PledgePaymentRecorded {
        paid_amount_minor,
        status: status.as_str().to_string(),
    }))
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PledgeDelete>,
) -> Result<(), ServerError> {
    state.ledger.delete_pledge(id, payload.actor_id).await?;
    Ok(())
}
