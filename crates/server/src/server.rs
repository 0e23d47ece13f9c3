use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use sea_orm::DatabaseConnection;

use std::sync::Arc;

use crate::{accounts, debts, entries, pledges, sales};
use ledger::Ledger;

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub db: DatabaseConnection,
}

async fn health(State(state): State<ServerState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::error!("health check failed: {err}");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/entries", post(entries::entry_new))
        .route(
            "/entries/{id}",
            patch(entries::update).delete(entries::remove),
        )
        .route("/pledges", post(pledges::pledge_new))
        .route(
            "/pledges/{id}",
            patch(pledges::update).delete(pledges::remove),
        )
        .route("/pledges/{id}/payments", post(pledges::payment_new))
        .route("/debts", post(debts::debt_new))
        .route("/debts/{id}", delete(debts::remove))
        .route("/debts/{id}/payments", post(debts::payment_new))
        .route("/sales", post(sales::sale_new))
        .route("/accounts", post(accounts::account_new))
        .route("/accounts/audit", get(accounts::audit))
        .route("/accounts/{id}", get(accounts::get))
        .route("/accounts/{id}/initialize", post(accounts::initialize))
        .with_state(state)
}

pub async fn run(ledger: Ledger, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(ledger, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        ledger: Arc::new(ledger),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    ledger: Ledger,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(ledger, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
