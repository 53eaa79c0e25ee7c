//! Read Service for Users

use rbac_auth::CurrentUser;
use rbac_core::traits::Id;
use rbac_core::{RbacError, RbacResult};
use rbac_db::UserStore;
use rbac_models::{Permission, User};

pub struct ReadUsersService<'a> {
    store: &'a dyn UserStore,
    actor: &'a CurrentUser,
}

impl<'a> ReadUsersService<'a> {
    pub fn new(store: &'a dyn UserStore, actor: &'a CurrentUser) -> Self {
        Self { store, actor }
    }

    /// All users, ordered by id
    pub async fn list(&self) -> RbacResult<Vec<User>> {
        self.actor.require(Permission::CanReadUser)?;
        Ok(self.store.list().await?)
    }

    pub async fn find(&self, id: Id) -> RbacResult<User> {
        self.actor.require(Permission::CanReadUser)?;
        self.store
            .find(id)
            .await?
            .ok_or_else(|| RbacError::not_found("User", "id", id))
    }
}
