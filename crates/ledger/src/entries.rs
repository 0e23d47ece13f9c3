//! Ledger entry primitives.
//!
//! An `Entry` is a single posted movement against one account. Income entries
//! credit the account, Expenditure and PettyCash entries debit it; the three
//! kinds share every operation and differ only in sign.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Income,
    Expenditure,
    PettyCash,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expenditure => "expenditure",
            Self::PettyCash => "petty_cash",
        }
    }

    /// Balance sign convention: +1 credit, -1 debit.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Income => 1,
            Self::Expenditure | Self::PettyCash => -1,
        }
    }

    /// Whether posting this kind requires a sufficient-funds pre-check.
    #[must_use]
    pub const fn is_debit(self) -> bool {
        self.sign() < 0
    }
}

impl TryFrom<&str> for EntryKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expenditure" => Ok(Self::Expenditure),
            "petty_cash" => Ok(Self::PettyCash),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid entry kind: {other}"
            ))),
        }
    }
}

/// Optional back-reference from a posting to the engine event that created
/// it. Entries carrying a source are audit rows and immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntrySource {
    Pledge(Uuid),
    Debt(Uuid),
    Sale(Uuid),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub id: Uuid,
    pub kind: EntryKind,
    pub account_id: Uuid,
    /// Always positive; the sign lives in `kind`.
    pub amount_minor: i64,
    pub occurred_at: DateTime<Utc>,
    /// Free-text source/purpose shown to operators.
    pub label: String,
    pub created_by: Uuid,
    /// Set only on the synthetic balance-initialization marker.
    pub init_marker: bool,
    pub source: Option<EntrySource>,
}

impl Entry {
    pub fn new(
        kind: EntryKind,
        account_id: Uuid,
        amount_minor: i64,
        occurred_at: DateTime<Utc>,
        label: String,
        created_by: Uuid,
    ) -> Result<Self, LedgerError> {
        if amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            account_id,
            amount_minor,
            occurred_at,
            label,
            created_by,
            init_marker: false,
            source: None,
        })
    }

    /// Signed effect of this entry on its account's balance.
    #[must_use]
    pub fn signed_amount_minor(&self) -> i64 {
        self.kind.sign() * self.amount_minor
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub account_id: String,
    pub amount_minor: i64,
    pub occurred_at: DateTimeUtc,
    pub label: String,
    pub created_by: String,
    pub init_marker: bool,
    pub pledge_id: Option<String>,
    pub debt_id: Option<String>,
    pub sale_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Entry> for ActiveModel {
    fn from(entry: &Entry) -> Self {
        let (pledge_id, debt_id, sale_id) = match entry.source {
            Some(EntrySource::Pledge(id)) => (Some(id.to_string()), None, None),
            Some(EntrySource::Debt(id)) => (None, Some(id.to_string()), None),
            Some(EntrySource::Sale(id)) => (None, None, Some(id.to_string())),
            None => (None, None, None),
        };
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            kind: ActiveValue::Set(entry.kind.as_str().to_string()),
            account_id: ActiveValue::Set(entry.account_id.to_string()),
            amount_minor: ActiveValue::Set(entry.amount_minor),
            occurred_at: ActiveValue::Set(entry.occurred_at),
            label: ActiveValue::Set(entry.label.clone()),
            created_by: ActiveValue::Set(entry.created_by.to_string()),
            init_marker: ActiveValue::Set(entry.init_marker),
            pledge_id: ActiveValue::Set(pledge_id),
            debt_id: ActiveValue::Set(debt_id),
            sale_id: ActiveValue::Set(sale_id),
        }
    }
}

impl TryFrom<Model> for Entry {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let parse = |raw: &str, what: &str| {
            Uuid::parse_str(raw).map_err(|_| LedgerError::NotFound(what.to_string()))
        };
        let source = match (&model.pledge_id, &model.debt_id, &model.sale_id) {
            (Some(id), _, _) => Some(EntrySource::Pledge(parse(id, "pledge")?)),
            (_, Some(id), _) => Some(EntrySource::Debt(parse(id, "debt")?)),
            (_, _, Some(id)) => Some(EntrySource::Sale(parse(id, "sale")?)),
            _ => None,
        };
        Ok(Self {
            id: parse(&model.id, "entry")?,
            kind: EntryKind::try_from(model.kind.as_str())?,
            account_id: parse(&model.account_id, "account")?,
            amount_minor: model.amount_minor,
            occurred_at: model.occurred_at,
            label: model.label,
            created_by: parse(&model.created_by, "profile")?,
            init_marker: model.init_marker,
            source,
        })
    }
}
