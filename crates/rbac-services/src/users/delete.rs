//! Delete Service for Users

use rbac_auth::CurrentUser;
use rbac_core::traits::Id;
use rbac_core::{RbacError, RbacResult};
use rbac_db::UserStore;
use rbac_models::Permission;

pub struct DeleteUserService<'a> {
    store: &'a dyn UserStore,
    actor: &'a CurrentUser,
}

impl<'a> DeleteUserService<'a> {
    pub fn new(store: &'a dyn UserStore, actor: &'a CurrentUser) -> Self {
        Self { store, actor }
    }

    /// Execute the delete operation
    pub async fn call(self, id: Id) -> RbacResult<()> {
        self.actor.require(Permission::CanDeleteUser)?;

        if id == self.actor.id {
            return Err(RbacError::conflict("You cannot delete your own account"));
        }

        if !self.store.delete(id).await? {
            return Err(RbacError::not_found("User", "id", id));
        }

        tracing::info!(user_id = id, deleted_by = self.actor.id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::{actor, admin, seed};
    use rbac_db::MemoryUserStore;

    #[tokio::test]
    async fn test_delete_user() {
        let store = MemoryUserStore::new();
        seed(&store, "me").await;
        let victim = seed(&store, "victim").await;
        let current = admin();

        DeleteUserService::new(&store, &current)
            .call(victim.id)
            .await
            .unwrap();
        assert!(store.find(victim.id).await.unwrap().is_none());

        let err = DeleteUserService::new(&store, &current)
            .call(victim.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let store = MemoryUserStore::new();
        let me = seed(&store, "me").await;
        let current = actor(me.id, &[Permission::CanDeleteUser]);

        let err = DeleteUserService::new(&store, &current)
            .call(me.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_requires_permission() {
        let store = MemoryUserStore::new();
        let victim = seed(&store, "victim").await;
        let current = actor(7, &[Permission::CanReadUser, Permission::CanUpdateUser]);

        let err = DeleteUserService::new(&store, &current)
            .call(victim.id)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
