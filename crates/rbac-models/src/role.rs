//! Role model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::permission::{Permission, PermissionSet};

/// User role
///
/// The role is a label. Only the stored permission set authorizes requests;
/// `default_permissions` is what the create form pre-checks for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Staff];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str().eq_ignore_ascii_case(s))
    }

    /// Permissions pre-checked in the create form for this role
    pub fn default_permissions(&self) -> PermissionSet {
        match self {
            Role::Admin => PermissionSet::from(&Permission::ALL[..]),
            Role::Staff => PermissionSet::from(&[Permission::CanReadUser][..]),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
