//! Repository trait for user persistence

use async_trait::async_trait;
use rbac_core::traits::Id;
use rbac_core::RbacError;
use rbac_models::User;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<RepositoryError> for RbacError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => RbacError::not_found("User", "id", id),
            RepositoryError::Conflict(message) => RbacError::conflict(message),
            RepositoryError::Database(e) => RbacError::Database(e.to_string()),
            RepositoryError::Corrupt(message) => RbacError::Internal(message),
        }
    }
}

/// Storage of user accounts.
///
/// Usernames are unique; `insert` and `update` fail with `Conflict` when a
/// username is taken by another user. `list` is ordered by id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Reserve the next user id. Ids are never reused.
    async fn next_id(&self) -> RepositoryResult<Id>;

    async fn insert(&self, user: User) -> RepositoryResult<User>;

    async fn find(&self, id: Id) -> RepositoryResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    async fn list(&self) -> RepositoryResult<Vec<User>>;

    /// Replace the stored user with the same id
    async fn update(&self, user: &User) -> RepositoryResult<User>;

    /// Returns whether a user was removed
    async fn delete(&self, id: Id) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<i64>;
}
