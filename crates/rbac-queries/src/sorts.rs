//! Sort state of the user table

use rbac_models::User;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::columns::UserColumn;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1)
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Get the opposite direction
    pub fn reverse(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Single sort key plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub column: UserColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: UserColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header click: the current column flips direction, another column
    /// becomes the key in ascending order.
    pub fn toggle(&mut self, column: UserColumn) {
        if self.column == column {
            self.direction = self.direction.reverse();
        } else {
            self.column = column;
            self.direction = SortDirection::Asc;
        }
    }

    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        self.direction.apply(self.column.compare(a, b))
    }

    /// Sort in place. Stable, so equal keys keep their relative order.
    pub fn sort(&self, users: &mut [&User]) {
        users.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbac_models::NewUser;

    fn user(id: i64, name: &str) -> User {
        User::from_new(id, &NewUser::new(format!("u{}", id), "pw").with_name(name), String::new())
    }

    #[test]
    fn test_sort_direction() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
        assert_eq!(SortDirection::Asc.reverse(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.as_str(), "desc");
    }

    #[test]
    fn test_toggle() {
        let mut state = SortState::default();
        assert_eq!(state, SortState::new(UserColumn::Id, SortDirection::Asc));

        state.toggle(UserColumn::Id);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle(UserColumn::Name);
        assert_eq!(state, SortState::new(UserColumn::Name, SortDirection::Asc));

        state.toggle(UserColumn::Name);
        state.toggle(UserColumn::Name);
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn test_sort_is_stable() {
        let a = user(1, "same");
        let b = user(2, "other");
        let c = user(3, "same");
        let mut rows = vec![&c, &a, &b];

        SortState::new(UserColumn::Name, SortDirection::Asc).sort(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        SortState::new(UserColumn::Name, SortDirection::Desc).sort(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_numeric_id_sort() {
        let users: Vec<User> = [10, 2, 33, 1].iter().map(|&id| user(id, "x")).collect();
        let mut rows: Vec<&User> = users.iter().collect();
        SortState::new(UserColumn::Id, SortDirection::Desc).sort(&mut rows);
        let ids: Vec<i64> = rows.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![33, 10, 2, 1]);
    }
}
