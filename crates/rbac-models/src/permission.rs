//! Permission strings
//!
//! Authorization is membership of a permission string in the set the server
//! holds for a user. The four built-in permissions cover user management.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Built-in permissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Permission {
    CanCreateUser,
    CanReadUser,
    CanUpdateUser,
    CanDeleteUser,
}

impl Permission {
    pub const ALL: [Permission; 4] = [
        Permission::CanCreateUser,
        Permission::CanReadUser,
        Permission::CanUpdateUser,
        Permission::CanDeleteUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanCreateUser => "CanCreateUser",
            Permission::CanReadUser => "CanReadUser",
            Permission::CanUpdateUser => "CanUpdateUser",
            Permission::CanDeleteUser => "CanDeleteUser",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    /// Label shown next to the checkbox in user forms
    pub fn label(&self) -> &'static str {
        match self {
            Permission::CanCreateUser => "Create users",
            Permission::CanReadUser => "View users",
            Permission::CanUpdateUser => "Edit users",
            Permission::CanDeleteUser => "Delete users",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, duplicate-free list of permission strings.
///
/// Unknown strings are kept verbatim so a round trip through an older
/// client does not drop permissions it does not know about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(Vec<String>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[CanReadUser]`, the set a new user gets when none is given
    pub fn read_only() -> Self {
        Self::from(&[Permission::CanReadUser][..])
    }

    pub fn insert(&mut self, permission: impl Into<String>) -> bool {
        let permission = permission.into();
        let permission = permission.trim();
        if permission.is_empty() || self.0.iter().any(|p| p == permission) {
            return false;
        }
        self.0.push(permission.to_string());
        true
    }

    pub fn remove(&mut self, permission: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|p| p != permission);
        self.0.len() != before
    }

    /// The authorization predicate
    pub fn contains(&self, permission: &str) -> bool {
        self.0.iter().any(|p| p == permission)
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.contains(permission.as_str())
    }

    pub fn allows_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.allows(*p))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Storage form: `"CanReadUser,CanUpdateUser"`
    pub fn to_comma_string(&self) -> String {
        self.0.join(",")
    }

    pub fn from_comma_string(s: &str) -> Self {
        s.split(',').collect()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PermissionSet::new();
        for p in iter {
            set.insert(p);
        }
        set
    }
}

impl From<&[Permission]> for PermissionSet {
    fn from(permissions: &[Permission]) -> Self {
        permissions.iter().map(|p| p.as_str()).collect()
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_comma_string())
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept both the JSON array and the comma-joined storage form.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<String>),
            Joined(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::List(items) => items.into_iter().collect(),
            Repr::Joined(joined) => PermissionSet::from_comma_string(&joined),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permission() {
        assert_eq!(Permission::parse("CanDeleteUser"), Some(Permission::CanDeleteUser));
        assert_eq!(Permission::parse("candeleteuser"), None);
    }

    #[test]
    fn test_membership() {
        let set = PermissionSet::from(&[Permission::CanReadUser, Permission::CanUpdateUser][..]);
        assert!(set.contains("CanReadUser"));
        assert!(set.allows(Permission::CanUpdateUser));
        assert!(!set.allows(Permission::CanDeleteUser));
        assert!(set.allows_all(&[Permission::CanReadUser, Permission::CanUpdateUser]));
        assert!(!set.allows_all(&[Permission::CanReadUser, Permission::CanCreateUser]));
    }

    #[test]
    fn test_deduplicates_and_trims() {
        let set = PermissionSet::from_comma_string("CanReadUser, CanReadUser,,CanDeleteUser");
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_comma_string(), "CanReadUser,CanDeleteUser");
    }

    #[test]
    fn test_unknown_permissions_are_kept() {
        let set = PermissionSet::from_comma_string("CanReadUser,CanExportUsers");
        assert!(set.contains("CanExportUsers"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_accepts_both_forms() {
        let from_list: PermissionSet =
            serde_json::from_str(r#"["CanReadUser","CanCreateUser"]"#).unwrap();
        let from_joined: PermissionSet =
            serde_json::from_str(r#""CanReadUser,CanCreateUser""#).unwrap();
        assert_eq!(from_list, from_joined);
        assert_eq!(
            serde_json::to_string(&from_list).unwrap(),
            r#"["CanReadUser","CanCreateUser"]"#
        );
    }

    #[test]
    fn test_remove() {
        let mut set = PermissionSet::from_comma_string("CanReadUser,CanDeleteUser");
        assert!(set.remove("CanDeleteUser"));
        assert!(!set.remove("CanDeleteUser"));
        assert_eq!(set.to_comma_string(), "CanReadUser");
    }
}
