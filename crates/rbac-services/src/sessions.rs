//! Login, session resolution and the bootstrap administrator

use rbac_auth::{
    verify_password_blocking, AuthError, AuthenticatedToken, CurrentUser, JwtService,
};
use rbac_core::{RbacError, RbacResult};
use rbac_db::UserStore;
use rbac_models::{LoginRequest, NewUser, Permission, PermissionSet, Role, User};

use crate::contract::UserContract;
use crate::users::CreateUserService;

/// A successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
}

/// Exchanges credentials for an access token
pub struct LoginService<'a> {
    store: &'a dyn UserStore,
    jwt: &'a JwtService,
}

impl<'a> LoginService<'a> {
    pub fn new(store: &'a dyn UserStore, jwt: &'a JwtService) -> Self {
        Self { store, jwt }
    }

    /// Unknown usernames and wrong passwords fail the same way
    pub async fn call(self, request: &LoginRequest) -> RbacResult<LoginOutcome> {
        let user = match self.store.find_by_username(request.username.trim()).await? {
            Some(user) => {
                let password = request.password.clone();
                let matches = verify_password_blocking(password, user.password_hash.clone()).await;
                matches.then_some(user)
            }
            None => None,
        };

        let Some(user) = user else {
            tracing::warn!(username = %request.username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        };

        let access_token = self
            .jwt
            .create_token(&user)
            .map_err(|e| RbacError::Internal(e.to_string()))?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");
        Ok(LoginOutcome { user, access_token })
    }
}

/// Load the caller named by a valid token.
///
/// Permissions come from the stored user, so changes apply on the next
/// request. A token for a deleted user is rejected.
pub async fn resolve_current_user(
    store: &dyn UserStore,
    token: &AuthenticatedToken,
) -> RbacResult<CurrentUser> {
    match store.find(token.user_id).await? {
        Some(user) => Ok(CurrentUser::from(&user)),
        None => {
            tracing::warn!(user_id = token.user_id, "Token names a user that no longer exists");
            Err(AuthError::InvalidToken.into())
        }
    }
}

/// Create the bootstrap administrator unless a user with that name exists.
///
/// Returns the new user, or `None` when nothing was created.
pub async fn ensure_admin(
    store: &dyn UserStore,
    username: &str,
    password: &str,
    contract: UserContract,
) -> RbacResult<Option<User>> {
    if store.find_by_username(username.trim()).await?.is_some() {
        tracing::debug!(username, "Bootstrap administrator already present");
        return Ok(None);
    }

    let new_user = NewUser::new(username, password)
        .with_name("Administrator")
        .with_role(Role::Admin)
        .with_permissions(PermissionSet::from(&Permission::ALL[..]));

    let user = CreateUserService::system(store)
        .with_contract(contract)
        .call(new_user)
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap administrator created");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::seed;
    use rbac_db::MemoryUserStore;

    const SECRET: &[u8] = b"test-secret-key-at-least-32-bytes";

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let store = MemoryUserStore::new();
        let user = seed(&store, "alice").await;
        let jwt = JwtService::new(SECRET, 1800);

        let outcome = LoginService::new(&store, &jwt)
            .call(&login("alice", "password123"))
            .await
            .unwrap();

        assert_eq!(outcome.user.id, user.id);
        let claims = jwt.validate_token(&outcome.access_token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn test_login_failures_look_alike() {
        let store = MemoryUserStore::new();
        seed(&store, "alice").await;
        let jwt = JwtService::new(SECRET, 1800);

        for request in [login("alice", "wrong"), login("nobody", "password123")] {
            let err = LoginService::new(&store, &jwt).call(&request).await.unwrap_err();
            assert_eq!(err.status_code(), 401);
            assert_eq!(err.public_message(), "Invalid username or password");
        }
    }

    #[tokio::test]
    async fn test_resolve_current_user() {
        let store = MemoryUserStore::new();
        let user = seed(&store, "alice").await;
        let token = AuthenticatedToken {
            user_id: user.id,
            username: "alice".to_string(),
            role: "Staff".to_string(),
        };

        let current = resolve_current_user(&store, &token).await.unwrap();
        assert!(current.can(Permission::CanReadUser));
        assert!(!current.can(Permission::CanCreateUser));

        store.delete(user.id).await.unwrap();
        let err = resolve_current_user(&store, &token).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.public_message(), "Invalid token");
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let store = MemoryUserStore::new();

        let created = ensure_admin(&store, "admin", "admin-password", UserContract::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.role, Role::Admin);
        assert!(created.permissions.allows_all(&Permission::ALL));

        let again = ensure_admin(&store, "admin", "other-password", UserContract::default())
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(store.count().await.unwrap(), 1);
    }
}
