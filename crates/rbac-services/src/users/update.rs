//! Update Service for Users

use chrono::Utc;
use rbac_auth::{hash_password_blocking, CurrentUser};
use rbac_core::traits::Id;
use rbac_core::{RbacError, RbacResult};
use rbac_db::UserStore;
use rbac_models::{Permission, User, UserPatch};
use serde_json::{Map, Value};

use crate::contract::UserContract;

/// Result of an update: the stored user and the attributes that changed
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub user: User,
    pub changed: Map<String, Value>,
}

pub struct UpdateUserService<'a> {
    store: &'a dyn UserStore,
    actor: &'a CurrentUser,
    contract: UserContract,
}

impl<'a> UpdateUserService<'a> {
    pub fn new(store: &'a dyn UserStore, actor: &'a CurrentUser) -> Self {
        Self {
            store,
            actor,
            contract: UserContract::default(),
        }
    }

    pub fn with_contract(mut self, contract: UserContract) -> Self {
        self.contract = contract;
        self
    }

    /// Apply `patch` to user `id`.
    ///
    /// A new password is hashed and reported as `"[FILTERED]"`.
    pub async fn call(self, id: Id, patch: UserPatch) -> RbacResult<UserUpdate> {
        self.actor.require(Permission::CanUpdateUser)?;

        if patch.is_empty() {
            return Err(RbacError::BadRequest("No attributes to update".to_string()));
        }

        self.contract.validate_patch(&patch)?;

        let mut user = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", "id", id))?;

        if let Some(ref username) = patch.username {
            let username = username.trim();
            if username != user.username {
                if let Some(other) = self.store.find_by_username(username).await? {
                    if other.id != id {
                        return Err(RbacError::conflict("Username already exists"));
                    }
                }
            }
        }

        let mut changed = user.apply(&patch);

        if let Some(ref password) = patch.password {
            user.password_hash = hash_password_blocking(password.clone())
                .await
                .map_err(|e| RbacError::Internal(e.to_string()))?;
            changed.insert("password".to_string(), Value::String("[FILTERED]".to_string()));
        }

        if changed.is_empty() {
            tracing::debug!(user_id = id, "Update changed nothing");
            return Ok(UserUpdate { user, changed });
        }

        user.updated_at = Utc::now();
        let user = self.store.update(&user).await?;

        tracing::info!(
            user_id = id,
            updated_by = self.actor.id,
            attributes = ?changed.keys().collect::<Vec<_>>(),
            "User updated"
        );

        Ok(UserUpdate { user, changed })
    }
}
