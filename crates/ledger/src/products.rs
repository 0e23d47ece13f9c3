//! Products and on-hand stock. Stock only ever decreases, and only through
//! a sale; there is no sale reversal or restock flow.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price_minor: i64,
    /// On-hand quantity, never negative.
    pub current_stock: i64,
    /// Display threshold for low-stock warnings.
    pub reorder_point: i64,
}

impl Product {
    pub fn new(
        name: String,
        price_minor: i64,
        current_stock: i64,
        reorder_point: i64,
    ) -> Result<Self, LedgerError> {
        if price_minor < 0 || current_stock < 0 || reorder_point < 0 {
            return Err(LedgerError::InvalidAmount(
                "product price, stock and reorder point must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            price_minor,
            current_stock,
            reorder_point,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub current_stock: i64,
    pub reorder_point: i64,
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

impl From<&Product> for ActiveModel {
    fn from(product: &Product) -> Self {
        Self {
            id: ActiveValue::Set(product.id.to_string()),
            name: ActiveValue::Set(product.name.clone()),
            price_minor: ActiveValue::Set(product.price_minor),
            current_stock: ActiveValue::Set(product.current_stock),
            reorder_point: ActiveValue::Set(product.reorder_point),
        }
    }
}

impl TryFrom<Model> for Product {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("product".to_string()))?,
            name: model.name,
            price_minor: model.price_minor,
            current_stock: model.current_stock,
            reorder_point: model.reorder_point,
        })
    }
}
