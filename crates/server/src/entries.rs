//! Journal entry API endpoints

use api_types::entry::{EntryCreated, EntryDelete, EntryNew, EntryUpdate};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use ledger::{EntryKind, PostEntryCmd, UpdateEntryCmd};

fn kind_from_api(kind: api_types::entry::EntryKind) -> EntryKind {
    match kind {
        api_types::entry::EntryKind::Income => EntryKind::Income,
        api_types::entry::EntryKind::Expenditure => EntryKind::Expenditure,
        api_types::entry::EntryKind::PettyCash => EntryKind::PettyCash,
    }
}

pub async fn entry_new(
    State(state): State<ServerState>,
    Json(payload): Json<EntryNew>,
) -> Result<Json<EntryCreated>, ServerError> {
    let id = state
        .ledger
        .post_entry(PostEntryCmd {
            kind: kind_from_api(payload.kind),
            account_id: payload.account_id,
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at,
            label: payload.label,
            actor_id: payload.actor_id,
        })
        .await?;

    Ok(Json(EntryCreated { id }))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryUpdate>,
) -> Result<(), ServerError> {
    let mut cmd = UpdateEntryCmd::new(id, payload.actor_id);
    if let Some(amount) = payload.amount_minor {
        cmd = cmd.amount_minor(amount);
    }
    if let Some(account_id) = payload.account_id {
        cmd = cmd.account_id(account_id);
    }
    if let Some(occurred_at) = payload.occurred_at {
        cmd = cmd.occurred_at(occurred_at);
    }
    if let Some(label) = payload.label {
        cmd = cmd.label(label);
    }

    state.ledger.update_entry(cmd).await?;
    Ok(())
}

pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EntryDelete>,
) -> Result<(), ServerError> {
    state.ledger.delete_entry(id, payload.actor_id).await?;
    Ok(())
}
