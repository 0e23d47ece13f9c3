//! Financial accounts.
//!
//! An account is a named pool of funds with a denormalized running balance.
//! The balance is only ever mutated through `ops::accounts::apply_account_delta`
//! so that `current_balance == initial_balance + Σ signed postings` remains a
//! checkable invariant (see `ops::reconcile`).

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub name: String,
    pub owner_profile_id: Uuid,
    /// Running balance in minor units. May legitimately go negative.
    pub current_balance_minor: i64,
    pub initial_balance_minor: i64,
    /// Whether pledge/debt/sale credits may target this account.
    pub can_receive_payments: bool,
}

impl Account {
    pub fn new(
        name: String,
        owner_profile_id: Uuid,
        initial_balance_minor: i64,
        can_receive_payments: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            owner_profile_id,
            current_balance_minor: initial_balance_minor,
            initial_balance_minor,
            can_receive_payments,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub owner_profile_id: String,
    pub current_balance_minor: i64,
    pub initial_balance_minor: i64,
    pub can_receive_payments: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::entries::Entity")]
    Entries,
}

impl Related<super::entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            name: ActiveValue::Set(account.name.clone()),
            owner_profile_id: ActiveValue::Set(account.owner_profile_id.to_string()),
            current_balance_minor: ActiveValue::Set(account.current_balance_minor),
            initial_balance_minor: ActiveValue::Set(account.initial_balance_minor),
            can_receive_payments: ActiveValue::Set(account.can_receive_payments),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("account".to_string()))?,
            name: model.name,
            owner_profile_id: Uuid::parse_str(&model.owner_profile_id)
                .map_err(|_| LedgerError::NotFound("profile".to_string()))?,
            current_balance_minor: model.current_balance_minor,
            initial_balance_minor: model.initial_balance_minor,
            can_receive_payments: model.can_receive_payments,
        })
    }
}
