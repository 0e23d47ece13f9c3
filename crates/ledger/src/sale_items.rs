//! Sale line items. Each line decrements the matching product's stock by its
//! quantity when the sale is recorded.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub subtotal_minor: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "sale_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub subtotal_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sales::Entity",
        from = "Column::SaleId",
        to = "super::sales::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sales,
    #[sea_orm(
        belongs_to = "super::products::Entity",
        from = "Column::ProductId",
        to = "super::products::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Products,
}

impl Related<super::sales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SaleItem> for ActiveModel {
    fn from(item: &SaleItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            sale_id: ActiveValue::Set(item.sale_id.to_string()),
            product_id: ActiveValue::Set(item.product_id.to_string()),
            quantity: ActiveValue::Set(item.quantity),
            unit_price_minor: ActiveValue::Set(item.unit_price_minor),
            subtotal_minor: ActiveValue::Set(item.subtotal_minor),
        }
    }
}

impl TryFrom<Model> for SaleItem {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|_| LedgerError::NotFound(what.to_string()))
        };
        Ok(Self {
            id: parse(&model.id, "sale item")?,
            sale_id: parse(&model.sale_id, "sale")?,
            product_id: parse(&model.product_id, "product")?,
            quantity: model.quantity,
            unit_price_minor: model.unit_price_minor,
            subtotal_minor: model.subtotal_minor,
        })
    }
}
