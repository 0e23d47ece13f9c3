//! Point-of-sale transactions.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sale {
    pub id: Uuid,
    pub customer_name: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub payment_method: String,
    /// Account credited with the sale total when the sale is settled.
    pub account_id: Uuid,
    pub notes: Option<String>,
    pub total_minor: i64,
    /// False for deferred/credit sales; the caller then attaches a debt.
    pub settled: bool,
    pub created_by: Uuid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub customer_name: Option<String>,
    pub occurred_at: DateTimeUtc,
    pub payment_method: String,
    pub account_id: String,
    pub notes: Option<String>,
    pub total_minor: i64,
    pub settled: bool,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sale_items::Entity")]
    SaleItems,
}

impl Related<super::sale_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Sale> for ActiveModel {
    fn from(sale: &Sale) -> Self {
        Self {
            id: ActiveValue::Set(sale.id.to_string()),
            customer_name: ActiveValue::Set(sale.customer_name.clone()),
            occurred_at: ActiveValue::Set(sale.occurred_at),
            payment_method: ActiveValue::Set(sale.payment_method.clone()),
            account_id: ActiveValue::Set(sale.account_id.to_string()),
            notes: ActiveValue::Set(sale.notes.clone()),
            total_minor: ActiveValue::Set(sale.total_minor),
            settled: ActiveValue::Set(sale.settled),
            created_by: ActiveValue::Set(sale.created_by.to_string()),
        }
    }
}

impl TryFrom<Model> for Sale {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|_| LedgerError::NotFound(what.to_string()))
        };
        Ok(Self {
            id: parse(&model.id, "sale")?,
            customer_name: model.customer_name,
            occurred_at: model.occurred_at,
            payment_method: model.payment_method,
            account_id: parse(&model.account_id, "account")?,
            notes: model.notes,
            total_minor: model.total_minor,
            settled: model.settled,
            created_by: parse(&model.created_by, "profile")?,
        })
    }
}
