//! Sale API endpoints
//!
//! An on-credit sale is a composition: the sale is recorded without posting
//! any money, then a debt for the full total is created against the customer.

use api_types::sale::{SaleCreated, SaleNew};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};
use ledger::{CreateDebtCmd, Debtor, RecordSaleCmd};

pub async fn sale_new(
    State(state): State<ServerState>,
    Json(payload): Json<SaleNew>,
) -> Result<Json<SaleCreated>, ServerError> {
    // Validate the credit fields up front: the debt is created after the
    // sale, so a late failure would leave the stock already decremented.
    let credit = if payload.on_credit {
        let customer = payload.customer_name.clone().ok_or_else(|| {
            ServerError::Generic("customer_name required for on-credit sales".to_string())
        })?;
        let due_date = payload.credit_due_date.ok_or_else(|| {
            ServerError::Generic("credit_due_date required for on-credit sales".to_string())
        })?;
        Some((customer, due_date))
    } else {
        None
    };

    let mut cmd = RecordSaleCmd::new(
        payload.account_id,
        payload.payment_method,
        payload.occurred_at,
        payload.actor_id,
    );
    if let Some(name) = payload.customer_name.clone() {
        cmd = cmd.customer_name(name);
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }
    for line in payload.items {
        cmd = match line.unit_price_minor {
            Some(price) => cmd.item_priced(line.product_id, line.quantity, price),
            None => cmd.item(line.product_id, line.quantity),
        };
    }
    if payload.on_credit {
        cmd = cmd.unsettled();
    }

    let (id, total_minor) = state.ledger.record_sale(cmd).await?;

    let debt_id = if let Some((customer, due_date)) = credit {
        let debt_cmd = CreateDebtCmd::new(
            Debtor::Customer(customer),
            format!("sale {id}"),
            total_minor,
            due_date,
            payload.actor_id,
        )
        .sale_id(id);
        Some(state.ledger.create_debt(debt_cmd).await?)
    } else {
        None
    };

    Ok(Json(SaleCreated {
        id,
        total_minor,
        debt_id,
    }))
}
