//! Free-text search over users

use rbac_models::User;

/// Case-insensitive substring search across every field of a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    term: String,
    needle: String,
}

impl SearchFilter {
    pub fn new(term: impl Into<String>) -> Self {
        let term = term.into();
        let needle = term.to_lowercase();
        Self { term, needle }
    }

    /// The term as typed
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// An empty term matches everyone
    pub fn matches(&self, user: &User) -> bool {
        self.is_empty()
            || user
                .search_text()
                .iter()
                .any(|value| value.to_lowercase().contains(&self.needle))
    }

    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}
