//! Permission checks for the authenticated caller

use rbac_core::traits::Id;
use rbac_models::{Permission, PermissionSet, Role, SessionUser, User};

use crate::middleware::AuthError;

/// The caller of a request, resolved from the user store
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: Id,
    pub username: String,
    pub role: Role,
    permissions: PermissionSet,
}

impl CurrentUser {
    pub fn new(id: Id, username: impl Into<String>, role: Role, permissions: PermissionSet) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            permissions,
        }
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }

    /// Fail with `InsufficientPermissions` unless the caller holds `permission`
    pub fn require(&self, permission: Permission) -> Result<(), AuthError> {
        if self.can(permission) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = self.id,
                permission = permission.as_str(),
                "Permission denied"
            );
            Err(AuthError::InsufficientPermissions)
        }
    }

    pub fn to_session(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            permissions: self.permissions.clone(),
        }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.username.clone(), user.role, user.permissions.clone())
    }
}
