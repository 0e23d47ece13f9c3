//! Point-of-sale recording.
//!
//! The riskiest atomic operation in the system: one sale touches the stock of
//! every line's product, its own rows and the receiving account. Everything
//! runs in a single database transaction; a failing line aborts the whole
//! sale with no partial stock decrement and no posting.

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Entry, EntryKind, EntrySource, LedgerError, Product, RecordSaleCmd, ResultLedger, Sale,
    SaleItem, products, sale_items, sales,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

impl Ledger {
    /// Create a product record with its opening stock.
    pub async fn create_product(
        &self,
        name: &str,
        price_minor: i64,
        current_stock: i64,
        reorder_point: i64,
        actor_id: Uuid,
    ) -> ResultLedger<Uuid> {
        let name = normalize_required_text(name, "product name")?;
        with_tx!(self, |db_tx| {
            self.require_writer(&db_tx, actor_id).await?;
            let product = Product::new(name, price_minor, current_stock, reorder_point)?;
            products::ActiveModel::from(&product).insert(&db_tx).await?;
            Ok(product.id)
        })
    }

    /// Return a product snapshot.
    pub async fn product(&self, product_id: Uuid) -> ResultLedger<Product> {
        with_tx!(self, |db_tx| {
            let model = products::Entity::find_by_id(product_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("product {product_id}")))?;
            Product::try_from(model)
        })
    }

    /// Record a multi-line sale.
    ///
    /// Per line: the product must exist and have enough stock, which is then
    /// decremented. On success the sale and its items are persisted and, when
    /// the sale is settled, the total is posted as an Income credit. An
    /// unsettled (deferred/credit) sale posts nothing; the caller composes
    /// [`create_debt`] with the sale id for the deferred amount.
    ///
    /// [`create_debt`]: Ledger::create_debt
    pub async fn record_sale(&self, cmd: RecordSaleCmd) -> ResultLedger<(Uuid, i64)> {
        if cmd.items.is_empty() {
            return Err(LedgerError::InvalidAmount(
                "a sale needs at least one item".to_string(),
            ));
        }
        let payment_method = normalize_required_text(&cmd.payment_method, "payment method")?;
        with_tx!(self, |db_tx| {
            let actor = self.require_writer(&db_tx, cmd.actor_id).await?;
            self.require_receiving_account(&db_tx, cmd.account_id)
                .await?;

            let sale_id = Uuid::new_v4();
            let mut total_minor = 0i64;
            let mut items: Vec<SaleItem> = Vec::with_capacity(cmd.items.len());

            for line in &cmd.items {
                if line.quantity <= 0 {
                    return Err(LedgerError::InvalidAmount(
                        "item quantity must be > 0".to_string(),
                    ));
                }
                let product_model = products::Entity::find_by_id(line.product_id.to_string())
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::NotFound(format!("product {}", line.product_id))
                    })?;
                if line.quantity > product_model.current_stock {
                    return Err(LedgerError::InsufficientStock(format!(
                        "{}: requested {}, on hand {}",
                        product_model.name, line.quantity, product_model.current_stock
                    )));
                }

                let unit_price = line.unit_price_minor.unwrap_or(product_model.price_minor);
                if unit_price < 0 {
                    return Err(LedgerError::InvalidAmount(
                        "unit price must be >= 0".to_string(),
                    ));
                }
                let overflow =
                    || LedgerError::InvalidAmount("sale total overflows".to_string());
                let subtotal = unit_price
                    .checked_mul(line.quantity)
                    .ok_or_else(overflow)?;
                total_minor = total_minor.checked_add(subtotal).ok_or_else(overflow)?;

                let active = products::ActiveModel {
                    id: ActiveValue::Set(product_model.id.clone()),
                    current_stock: ActiveValue::Set(product_model.current_stock - line.quantity),
                    ..Default::default()
                };
                active.update(&db_tx).await?;

                items.push(SaleItem {
                    id: Uuid::new_v4(),
                    sale_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price_minor: unit_price,
                    subtotal_minor: subtotal,
                });
            }

            let sale = Sale {
                id: sale_id,
                customer_name: normalize_optional_text(cmd.customer_name.as_deref()),
                occurred_at: cmd.occurred_at,
                payment_method,
                account_id: cmd.account_id,
                notes: normalize_optional_text(cmd.notes.as_deref()),
                total_minor,
                settled: cmd.settled,
                created_by: actor.id,
            };
            sales::ActiveModel::from(&sale).insert(&db_tx).await?;
            for item in &items {
                sale_items::ActiveModel::from(item).insert(&db_tx).await?;
            }

            if cmd.settled && total_minor > 0 {
                let mut entry = Entry::new(
                    EntryKind::Income,
                    cmd.account_id,
                    total_minor,
                    cmd.occurred_at,
                    match &sale.customer_name {
                        Some(name) => format!("sale to {name}"),
                        None => "sale".to_string(),
                    },
                    actor.id,
                )?;
                entry.source = Some(EntrySource::Sale(sale_id));
                self.insert_posting(&db_tx, &entry).await?;
            }

            Ok((sale_id, total_minor))
        })
    }

    /// Return a sale with its line items.
    pub async fn sale(&self, sale_id: Uuid) -> ResultLedger<(Sale, Vec<SaleItem>)> {
        with_tx!(self, |db_tx| {
            let model = sales::Entity::find_by_id(sale_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("sale {sale_id}")))?;
            let sale = Sale::try_from(model)?;
            let item_models = sale_items::Entity::find()
                .filter(sale_items::Column::SaleId.eq(sale_id.to_string()))
                .all(&db_tx)
                .await?;
            let items = item_models
                .into_iter()
                .map(SaleItem::try_from)
                .collect::<ResultLedger<Vec<_>>>()?;
            Ok((sale, items))
        })
    }
}
