//! Create Service for Users

use rbac_auth::{hash_password_blocking, CurrentUser};
use rbac_core::{RbacError, RbacResult};
use rbac_db::UserStore;
use rbac_models::{NewUser, Permission, User};

use crate::contract::UserContract;

/// Service for creating users
///
/// # Example
/// ```ignore
/// let service = CreateUserService::new(store.as_ref(), &current_user);
/// let user = service
///     .call(NewUser::new("johndoe", "securepassword123"))
///     .await?;
/// ```
pub struct CreateUserService<'a> {
    store: &'a dyn UserStore,
    actor: Option<&'a CurrentUser>,
    contract: UserContract,
}

impl<'a> CreateUserService<'a> {
    pub fn new(store: &'a dyn UserStore, actor: &'a CurrentUser) -> Self {
        Self {
            store,
            actor: Some(actor),
            contract: UserContract::default(),
        }
    }

    /// Create on behalf of the server itself, without a permission check
    pub fn system(store: &'a dyn UserStore) -> Self {
        Self {
            store,
            actor: None,
            contract: UserContract::default(),
        }
    }

    pub fn with_contract(mut self, contract: UserContract) -> Self {
        self.contract = contract;
        self
    }

    /// Execute the create operation
    pub async fn call(self, new_user: NewUser) -> RbacResult<User> {
        if let Some(actor) = self.actor {
            actor.require(Permission::CanCreateUser)?;
        }

        self.contract.validate_new(&new_user)?;

        let username = new_user.username.trim();
        if self.store.find_by_username(username).await?.is_some() {
            return Err(RbacError::conflict("Username already exists"));
        }

        let password_hash = hash_password_blocking(new_user.password.clone())
            .await
            .map_err(|e| RbacError::Internal(e.to_string()))?;

        let id = self.store.next_id().await?;
        let user = self
            .store
            .insert(User::from_new(id, &new_user, password_hash))
            .await?;

        tracing::info!(
            user_id = user.id,
            username = %user.username,
            created_by = self.actor.map(|a| a.id),
            "User created"
        );

        Ok(user)
    }
}
