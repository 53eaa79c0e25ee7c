//! Create and edit forms for users

use rbac_models::{NewUser, Permission, PermissionSet, Role, User, UserPatch};

/// Field values of the user form
///
/// The same form backs both pages. On the edit page a blank password means
/// "keep the current one".
#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub password: String,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl UserForm {
    /// Empty create form with the default role and its permissions checked
    pub fn blank() -> Self {
        let role = Role::default();
        Self {
            name: String::new(),
            username: String::new(),
            email: String::new(),
            phone: String::new(),
            website: String::new(),
            password: String::new(),
            role,
            permissions: role.default_permissions(),
        }
    }

    /// Edit form prefilled from `user`
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            website: user.website.clone(),
            password: String::new(),
            role: user.role,
            permissions: user.permissions.clone(),
        }
    }

    pub fn is_checked(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }

    /// Flip one permission checkbox
    pub fn toggle_permission(&mut self, permission: Permission) {
        if !self.permissions.remove(permission.as_str()) {
            self.permissions.insert(permission.as_str());
        }
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            website: self.website.trim().to_string(),
            role: Some(self.role),
            permissions: Some(self.permissions.clone()),
        }
    }

    /// Only the fields that differ from `original`
    pub fn to_patch(&self, original: &User) -> UserPatch {
        fn changed(value: &str, current: &str) -> Option<String> {
            let value = value.trim();
            (value != current).then(|| value.to_string())
        }

        let permissions_changed = self.permissions.len() != original.permissions.len()
            || self
                .permissions
                .iter()
                .any(|p| !original.permissions.contains(p));

        UserPatch {
            name: changed(&self.name, &original.name),
            username: changed(&self.username, &original.username),
            email: changed(&self.email, &original.email),
            phone: changed(&self.phone, &original.phone),
            website: changed(&self.website, &original.website),
            role: (self.role != original.role).then_some(self.role),
            permissions: permissions_changed.then(|| self.permissions.clone()),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}

impl Default for UserForm {
    fn default() -> Self {
        Self::blank()
    }
}
