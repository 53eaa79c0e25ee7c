//! Authentication and response bodies exchanged with `/api/v1`

use rbac_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::permission::{Permission, PermissionSet};
use crate::role::Role;
use crate::user::User;

/// POST /api/v1/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }
}

/// GET /api/v1/auth/check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Id,
    pub username: String,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl SessionUser {
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.allows(permission)
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            permissions: user.permissions.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 201 body of POST /api/v1/users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Id,
}

/// 200 body of PUT /api/v1/users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub message: String,
    #[serde(rename = "updatedAttributes")]
    pub updated_attributes: Map<String, Value>,
}

/// Body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
