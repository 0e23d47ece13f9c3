//! Recorded debt payments. Immutable audit rows: never edited, never deleted
//! automatically, and their existence blocks deletion of the owning debt.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebtPayment {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub amount_minor: i64,
    pub paid_at: DateTime<Utc>,
    pub method: String,
    pub account_id: Uuid,
    pub notes: Option<String>,
    pub created_by: Uuid,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "debt_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub debt_id: String,
    pub amount_minor: i64,
    pub paid_at: DateTimeUtc,
    pub method: String,
    pub account_id: String,
    pub notes: Option<String>,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::debts::Entity",
        from = "Column::DebtId",
        to = "super::debts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Debts,
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&DebtPayment> for ActiveModel {
    fn from(payment: &DebtPayment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id.to_string()),
            debt_id: ActiveValue::Set(payment.debt_id.to_string()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            paid_at: ActiveValue::Set(payment.paid_at),
            method: ActiveValue::Set(payment.method.clone()),
            account_id: ActiveValue::Set(payment.account_id.to_string()),
            notes: ActiveValue::Set(payment.notes.clone()),
            created_by: ActiveValue::Set(payment.created_by.to_string()),
        }
    }
}

impl TryFrom<Model> for DebtPayment {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|_| LedgerError::NotFound(what.to_string()))
        };
        Ok(Self {
            id: parse(&model.id, "debt payment")?,
            debt_id: parse(&model.debt_id, "debt")?,
            amount_minor: model.amount_minor,
            paid_at: model.paid_at,
            method: model.method,
            account_id: parse(&model.account_id, "account")?,
            notes: model.notes,
            created_by: parse(&model.created_by, "profile")?,
        })
    }
}
