//! Member pledges.
//!
//! A pledge is a promised contribution to a project. Creating one has no
//! balance effect; each recorded payment raises `paid_amount_minor` and posts
//! an Income credit. `Overdue` is a display-only derivation, never stored.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeStatus {
    Active,
    Paid,
}

impl PledgeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
        }
    }

    /// Status invariant: Paid iff `paid >= original`.
    #[must_use]
    pub fn derive(paid_minor: i64, original_minor: i64) -> Self {
        if paid_minor >= original_minor {
            Self::Paid
        } else {
            Self::Active
        }
    }
}

impl TryFrom<&str> for PledgeStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "paid" => Ok(Self::Paid),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid pledge status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pledge {
    pub id: Uuid,
    pub member_id: String,
    pub project_id: String,
    pub original_amount_minor: i64,
    pub paid_amount_minor: i64,
    pub due_date: NaiveDate,
    pub status: PledgeStatus,
    pub comments: Option<String>,
    pub created_by: Uuid,
    /// Account credited by the most recent payment; the collapsed reversal
    /// on deletion debits this account.
    pub last_payment_account_id: Option<Uuid>,
}

impl Pledge {
    pub fn new(
        member_id: String,
        project_id: String,
        original_amount_minor: i64,
        due_date: NaiveDate,
        comments: Option<String>,
        created_by: Uuid,
    ) -> Result<Self, LedgerError> {
        if original_amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "pledge amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            member_id,
            project_id,
            original_amount_minor,
            paid_amount_minor: 0,
            due_date,
            status: PledgeStatus::Active,
            comments,
            created_by,
            last_payment_account_id: None,
        })
    }

    /// Display-only: an active pledge whose due date is strictly in the past.
    /// Today itself does not count as overdue.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == PledgeStatus::Active && self.due_date < today
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "pledges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub member_id: String,
    pub project_id: String,
    pub original_amount_minor: i64,
    pub paid_amount_minor: i64,
    pub due_date: Date,
    pub status: String,
    pub comments: Option<String>,
    pub created_by: String,
    pub last_payment_account_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Pledge> for ActiveModel {
    fn from(pledge: &Pledge) -> Self {
        Self {
            id: ActiveValue::Set(pledge.id.to_string()),
            member_id: ActiveValue::Set(pledge.member_id.clone()),
            project_id: ActiveValue::Set(pledge.project_id.clone()),
            original_amount_minor: ActiveValue::Set(pledge.original_amount_minor),
            paid_amount_minor: ActiveValue::Set(pledge.paid_amount_minor),
            due_date: ActiveValue::Set(pledge.due_date),
            status: ActiveValue::Set(pledge.status.as_str().to_string()),
            comments: ActiveValue::Set(pledge.comments.clone()),
            created_by: ActiveValue::Set(pledge.created_by.to_string()),
            last_payment_account_id: ActiveValue::Set(
                pledge.last_payment_account_id.map(|id| id.to_string()),
            ),
        }
    }
}

impl TryFrom<Model> for Pledge {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("pledge".to_string()))?,
            member_id: model.member_id,
            project_id: model.project_id,
            original_amount_minor: model.original_amount_minor,
            paid_amount_minor: model.paid_amount_minor,
            due_date: model.due_date,
            status: PledgeStatus::try_from(model.status.as_str())?,
            comments: model.comments,
            created_by: Uuid::parse_str(&model.created_by)
                .map_err(|_| LedgerError::NotFound("profile".to_string()))?,
            last_payment_account_id: model
                .last_payment_account_id
                .as_deref()
                .and_then(|s| Uuid::parse_str(s).ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pledge(due: NaiveDate) -> Pledge {
        Pledge::new(
            "member-1".to_string(),
            "roof-fund".to_string(),
            10_000,
            due,
            None,
            Uuid::new_v4(),
        )
        .unwrap()
    }

    #[test]
    fn due_today_is_not_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert!(!pledge(today).is_overdue(today));
        assert!(pledge(today.pred_opt().unwrap()).is_overdue(today));
    }

    #[test]
    fn paid_pledges_are_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let mut pledge = pledge(today.pred_opt().unwrap());
        pledge.paid_amount_minor = pledge.original_amount_minor;
        pledge.status = PledgeStatus::derive(
            pledge.paid_amount_minor,
            pledge.original_amount_minor,
        );
        assert!(!pledge.is_overdue(today));
    }

    #[test]
    fn status_derivation_has_no_overpayment_clamp() {
        assert_eq!(PledgeStatus::derive(0, 200), PledgeStatus::Active);
        assert_eq!(PledgeStatus::derive(199, 200), PledgeStatus::Active);
        assert_eq!(PledgeStatus::derive(200, 200), PledgeStatus::Paid);
        assert_eq!(PledgeStatus::derive(500, 200), PledgeStatus::Paid);
    }
}
