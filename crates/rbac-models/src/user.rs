//! User model
//!
//! Table: rbac_users

use chrono::{DateTime, Utc};
use rbac_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permission::PermissionSet;
use crate::role::Role;

/// User account
///
/// Empty text fields are left out of the JSON representation. The password
/// hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    pub username: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub website: String,

    #[serde(default)]
    pub role: Role,

    #[serde(default)]
    pub permissions: PermissionSet,

    #[serde(skip)]
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user from a create request; the caller supplies id and hash
    pub fn from_new(id: Id, new_user: &NewUser, password_hash: String) -> Self {
        let now = Utc::now();
        let role = new_user.role.unwrap_or_default();
        Self {
            id,
            name: new_user.name.trim().to_string(),
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
            phone: new_user.phone.trim().to_string(),
            website: new_user.website.trim().to_string(),
            role,
            permissions: new_user
                .permissions
                .clone()
                .unwrap_or_else(PermissionSet::read_only),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Apply every field of `patch` except the password.
    ///
    /// Returns the attributes whose value actually changed, keyed by their
    /// JSON name.
    pub fn apply(&mut self, patch: &UserPatch) -> Map<String, Value> {
        let mut changed = Map::new();

        let text_fields: [(&str, &Option<String>, &mut String); 5] = [
            ("name", &patch.name, &mut self.name),
            ("username", &patch.username, &mut self.username),
            ("email", &patch.email, &mut self.email),
            ("phone", &patch.phone, &mut self.phone),
            ("website", &patch.website, &mut self.website),
        ];
        for (key, new_value, current) in text_fields {
            if let Some(value) = new_value {
                let value = value.trim();
                if current.as_str() != value {
                    *current = value.to_string();
                    changed.insert(key.to_string(), Value::String(value.to_string()));
                }
            }
        }

        if let Some(role) = patch.role {
            if role != self.role {
                self.role = role;
                changed.insert("role".to_string(), Value::String(role.to_string()));
            }
        }

        if let Some(ref permissions) = patch.permissions {
            if *permissions != self.permissions {
                self.permissions = permissions.clone();
                changed.insert(
                    "permissions".to_string(),
                    Value::Array(permissions.iter().map(|p| Value::String(p.to_string())).collect()),
                );
            }
        }

        changed
    }

    /// Every field value as text, for free-text search
    pub fn search_text(&self) -> [String; 8] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.username.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.website.clone(),
            self.role.to_string(),
            self.permissions.to_comma_string(),
        ]
    }
}

/// Create request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// `[CanReadUser]` when absent, whatever the role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = Some(permissions);
        self
    }
}

/// Update request. Absent fields are left untouched; an `id` in the body is
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }
}
