//! User table columns

use rbac_models::User;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A column of the user table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserColumn {
    #[default]
    Id,
    Name,
    Username,
    Email,
    Phone,
    Website,
    Role,
}

impl UserColumn {
    /// Columns in display order
    pub const ALL: [UserColumn; 7] = [
        UserColumn::Id,
        UserColumn::Name,
        UserColumn::Username,
        UserColumn::Email,
        UserColumn::Phone,
        UserColumn::Website,
        UserColumn::Role,
    ];

    /// Attribute key, as used in JSON
    pub fn key(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Username => "username",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Website => "website",
            Self::Role => "role",
        }
    }

    /// Header label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::Name => "Name",
            Self::Username => "Username",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Website => "Website",
            Self::Role => "Role",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Cell text for `user`
    pub fn value(&self, user: &User) -> String {
        match self {
            Self::Id => user.id.to_string(),
            Self::Name => user.name.clone(),
            Self::Username => user.username.clone(),
            Self::Email => user.email.clone(),
            Self::Phone => user.phone.clone(),
            Self::Website => user.website.clone(),
            Self::Role => user.role.to_string(),
        }
    }

    /// Ascending order of two users on this column.
    ///
    /// Ids compare numerically, everything else by code point.
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Username => a.username.cmp(&b.username),
            Self::Email => a.email.cmp(&b.email),
            Self::Phone => a.phone.cmp(&b.phone),
            Self::Website => a.website.cmp(&b.website),
            Self::Role => a.role.as_str().cmp(b.role.as_str()),
        }
    }
}

impl fmt::Display for UserColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
