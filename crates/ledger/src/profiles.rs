//! Acting profiles and their roles.
//!
//! Every ledger operation is invoked on behalf of a profile; the role decides
//! whether the operation is allowed at all (see `ops::access`).

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Admin,
    Treasurer,
    Viewer,
}

impl ProfileRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Treasurer => "treasurer",
            Self::Viewer => "viewer",
        }
    }

    /// Roles allowed to record, edit or reverse ledger state.
    #[must_use]
    pub fn can_write(self) -> bool {
        matches!(self, Self::Admin | Self::Treasurer)
    }
}

impl TryFrom<&str> for ProfileRole {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "treasurer" => Ok(Self::Treasurer),
            "viewer" => Ok(Self::Viewer),
            other => Err(LedgerError::InvalidAmount(format!(
                "invalid profile role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub role: ProfileRole,
}

impl Profile {
    pub fn new(name: String, role: ProfileRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub role: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Profile> for ActiveModel {
    fn from(profile: &Profile) -> Self {
        Self {
            id: ActiveValue::Set(profile.id.to_string()),
            name: ActiveValue::Set(profile.name.clone()),
            role: ActiveValue::Set(profile.role.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for Profile {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("profile".to_string()))?,
            name: model.name,
            role: ProfileRole::try_from(model.role.as_str())?,
        })
    }
}
