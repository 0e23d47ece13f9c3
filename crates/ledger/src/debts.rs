//! Debts owed to the organization.
//!
//! A debt is held either by a member (reference) or by an external customer
//! (free-text name), exactly one of the two. A debt may be linked to the
//! sale that originated it; the link is one-directional, debt to sale.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Outstanding,
    PartiallyPaid,
    Paid,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Outstanding => "outstanding",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
        }
    }

    /// Recomputed after every payment: Paid once nothing is due, otherwise
    /// PartiallyPaid as soon as any payment landed.
    #[must_use]
    pub fn derive(amount_due_minor: i64, original_minor: i64) -> Self {
        if amount_due_minor <= 0 {
            Self::Paid
        } else if amount_due_minor < original_minor {
            Self::PartiallyPaid
        } else {
            Self::Outstanding
        }
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "outstanding" => Ok(Self::Outstanding),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid debt status: {other}"
            ))),
        }
    }
}

/// Who owes the debt: a tracked member or an external customer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Debtor {
    Member(String),
    Customer(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub id: Uuid,
    pub debtor: Debtor,
    pub sale_id: Option<Uuid>,
    pub description: String,
    pub original_amount_minor: i64,
    pub amount_due_minor: i64,
    pub due_date: NaiveDate,
    pub status: DebtStatus,
    pub notes: Option<String>,
    pub created_by: Uuid,
}

impl Debt {
    pub fn new(
        debtor: Debtor,
        description: String,
        original_amount_minor: i64,
        due_date: NaiveDate,
        notes: Option<String>,
        created_by: Uuid,
    ) -> Result<Self, LedgerError> {
        if original_amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "debt amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            debtor,
            sale_id: None,
            description,
            original_amount_minor,
            amount_due_minor: original_amount_minor,
            due_date,
            status: DebtStatus::Outstanding,
            notes,
            created_by,
        })
    }

    /// Display-only derivation, same rule as pledges: strictly before today.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != DebtStatus::Paid && self.due_date < today
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub debtor_member_id: Option<String>,
    pub customer_name: Option<String>,
    pub sale_id: Option<String>,
    pub description: String,
    pub original_amount_minor: i64,
    pub amount_due_minor: i64,
    pub due_date: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::debt_payments::Entity")]
    DebtPayments,
}

impl Related<super::debt_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DebtPayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Debt> for ActiveModel {
    fn from(debt: &Debt) -> Self {
        let (member, customer) = match &debt.debtor {
            Debtor::Member(id) => (Some(id.clone()), None),
            Debtor::Customer(name) => (None, Some(name.clone())),
        };
        Self {
            id: ActiveValue::Set(debt.id.to_string()),
            debtor_member_id: ActiveValue::Set(member),
            customer_name: ActiveValue::Set(customer),
            sale_id: ActiveValue::Set(debt.sale_id.map(|id| id.to_string())),
            description: ActiveValue::Set(debt.description.clone()),
            original_amount_minor: ActiveValue::Set(debt.original_amount_minor),
            amount_due_minor: ActiveValue::Set(debt.amount_due_minor),
            due_date: ActiveValue::Set(debt.due_date),
            status: ActiveValue::Set(debt.status.as_str().to_string()),
            notes: ActiveValue::Set(debt.notes.clone()),
            created_by: ActiveValue::Set(debt.created_by.to_string()),
        }
    }
}

impl TryFrom<Model> for Debt {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let debtor = match (model.debtor_member_id, model.customer_name) {
            (Some(member), None) => Debtor::Member(member),
            (None, Some(customer)) => Debtor::Customer(customer),
            _ => {
                return Err(LedgerError::InconsistentState(
                    "debt must reference exactly one of member or customer".to_string(),
                ));
            }
        };
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("debt".to_string()))?,
            debtor,
            sale_id: model.sale_id.as_deref().and_then(|s| Uuid::parse_str(s).ok()),
            description: model.description,
            original_amount_minor: model.original_amount_minor,
            amount_due_minor: model.amount_due_minor,
            due_date: model.due_date,
            status: DebtStatus::try_from(model.status.as_str())?,
            notes: model.notes,
            created_by: Uuid::parse_str(&model.created_by)
                .map_err(|_| LedgerError::NotFound("profile".to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_derivation() {
        assert_eq!(DebtStatus::derive(500, 500), DebtStatus::Outstanding);
        assert_eq!(DebtStatus::derive(1, 500), DebtStatus::PartiallyPaid);
        assert_eq!(DebtStatus::derive(0, 500), DebtStatus::Paid);
    }

    #[test]
    fn overdue_counts_unpaid_statuses_only() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let yesterday = today.pred_opt().unwrap();
        let mut debt = Debt::new(
            Debtor::Customer("Rossi".to_string()),
            "supplies".to_string(),
            500,
            yesterday,
            None,
            Uuid::new_v4(),
        )
        .unwrap();
        assert!(debt.is_overdue(today));

        debt.status = DebtStatus::PartiallyPaid;
        assert!(debt.is_overdue(today));

        debt.status = DebtStatus::Paid;
        assert!(!debt.is_overdue(today));
    }
}
