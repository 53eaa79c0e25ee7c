//! User list page

use rbac_core::config::TableConfig;
use rbac_core::traits::Id;
use rbac_models::User;
use rbac_queries::{TableView, UserTable};

use crate::api::{ApiClient, ClientResult};

/// Users fetched from the server plus the table state over them.
/// Search, sort and paging run locally.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
    table: UserTable,
}

impl UserDirectory {
    pub fn new(table: UserTable) -> Self {
        Self {
            users: Vec::new(),
            table,
        }
    }

    /// Directory paged by `table.page_size`
    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(UserTable::from_config(config))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn table(&self) -> &UserTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut UserTable {
        &mut self.table
    }

    /// Replace the local list with the server's
    pub async fn reload(&mut self, client: &ApiClient) -> ClientResult<usize> {
        self.users = client.list_users().await?;
        tracing::debug!(count = self.users.len(), "User list loaded");
        Ok(self.users.len())
    }

    /// Delete on the server, then drop the row locally
    pub async fn delete(&mut self, client: &ApiClient, id: Id) -> ClientResult<String> {
        let response = client.delete_user(id).await?;
        self.users.retain(|u| u.id != id);
        Ok(response.message)
    }

    pub fn view(&mut self) -> TableView {
        self.table.view(&self.users)
    }
}
