//! Actor checks at operation entry points.
//!
//! The "can this actor perform X" question is answered inside the core, not
//! at the call sites, so the ledger is independently testable.

use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait, TransactionTrait};
use uuid::Uuid;

use crate::{LedgerError, Profile, ProfileRole, ResultLedger, profiles};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    pub(super) async fn require_profile(
        &self,
        db_tx: &DatabaseTransaction,
        profile_id: Uuid,
    ) -> ResultLedger<Profile> {
        let model = profiles::Entity::find_by_id(profile_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("profile {profile_id}")))?;
        Profile::try_from(model)
    }

    /// Actor must exist and hold a writing role (admin or treasurer).
    pub(super) async fn require_writer(
        &self,
        db_tx: &DatabaseTransaction,
        actor_id: Uuid,
    ) -> ResultLedger<Profile> {
        let profile = self.require_profile(db_tx, actor_id).await?;
        if !profile.role.can_write() {
            return Err(LedgerError::Forbidden(format!(
                "profile {actor_id} may not record ledger operations"
            )));
        }
        Ok(profile)
    }

    /// Actor must be an admin (balance initialization).
    pub(super) async fn require_admin(
        &self,
        db_tx: &DatabaseTransaction,
        actor_id: Uuid,
    ) -> ResultLedger<Profile> {
        let profile = self.require_profile(db_tx, actor_id).await?;
        if profile.role != ProfileRole::Admin {
            return Err(LedgerError::Forbidden(format!(
                "profile {actor_id} is not an administrator"
            )));
        }
        Ok(profile)
    }

    /// Create an acting profile (bootstrap/admin tooling).
    pub async fn create_profile(&self, name: &str, role: ProfileRole) -> ResultLedger<Uuid> {
        let name = normalize_required_text(name, "profile name")?;
        with_tx!(self, |db_tx| {
            let profile = Profile::new(name, role);
            profiles::ActiveModel::from(&profile).insert(&db_tx).await?;
            Ok(profile.id)
        })
    }

    /// Return a profile snapshot.
    pub async fn profile(&self, profile_id: Uuid) -> ResultLedger<Profile> {
        with_tx!(self, |db_tx| self.require_profile(&db_tx, profile_id).await)
    }
}
