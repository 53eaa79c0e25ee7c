//! Actions offered to the current session

use rbac_models::Permission;

use crate::context::SessionState;

/// Per-row actions of the user table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
        }
    }
}

/// Buttons and menu items the session may see
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Affordances {
    pub add_user: bool,
    pub edit_user: bool,
    pub delete_user: bool,
    pub view_users: bool,
}

impl Affordances {
    pub fn for_state(state: &SessionState) -> Self {
        Self {
            add_user: state.can(Permission::CanCreateUser),
            edit_user: state.can(Permission::CanUpdateUser),
            delete_user: state.can(Permission::CanDeleteUser),
            view_users: state.can(Permission::CanReadUser),
        }
    }

    /// Allowed row actions, in menu order
    pub fn row_actions(&self) -> Vec<RowAction> {
        let mut actions = Vec::new();
        if self.edit_user {
            actions.push(RowAction::Edit);
        }
        if self.delete_user {
            actions.push(RowAction::Delete);
        }
        actions
    }

    pub fn has_row_actions(&self) -> bool {
        self.edit_user || self.delete_user
    }
}
