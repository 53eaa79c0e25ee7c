//! In-memory user store, used in tests and when no database is configured

use async_trait::async_trait;
use rbac_core::traits::Id;
use rbac_models::User;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::repository::{RepositoryError, RepositoryResult, UserStore};

#[derive(Debug)]
pub struct MemoryUserStore {
    users: RwLock<BTreeMap<Id, User>>,
    last_id: AtomicI64,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(BTreeMap::new()),
            last_id: AtomicI64::new(0),
        }
    }
}

fn username_taken(users: &BTreeMap<Id, User>, username: &str, except: Id) -> bool {
    users
        .values()
        .any(|u| u.id != except && u.username == username)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn next_id(&self) -> RepositoryResult<Id> {
        Ok(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn insert(&self, user: User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!(
                "User id {} already exists",
                user.id
            )));
        }
        if username_taken(&users, &user.username, user.id) {
            return Err(RepositoryError::Conflict("Username already exists".to_string()));
        }

        // Keep the counter ahead of ids inserted without `next_id`.
        self.last_id.fetch_max(user.id, Ordering::SeqCst);
        users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "Inserted user");
        Ok(user)
    }

    async fn find(&self, id: Id) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn update(&self, user: &User) -> RepositoryResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound(user.id.to_string()));
        }
        if username_taken(&users, &user.username, user.id) {
            return Err(RepositoryError::Conflict("Username already exists".to_string()));
        }

        users.insert(user.id, user.clone());
        tracing::debug!(user_id = user.id, "Updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: Id) -> RepositoryResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}
