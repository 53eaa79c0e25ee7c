//! # rbac-db
//!
//! User persistence for RBAC Admin.
//!
//! - Connection pool management
//! - The `UserStore` repository trait
//! - A PostgreSQL store and an in-memory store
//!
//! ## Example
//!
//! ```ignore
//! use rbac_db::{Database, PgUserStore, UserStore};
//!
//! let db = Database::connect("postgres://localhost/rbac", &config.database).await?;
//! let store = PgUserStore::new(db.pool().clone());
//! store.ensure_schema().await?;
//! let admin = store.find_by_username("admin").await?;
//! ```

pub mod memory;
pub mod pool;
pub mod repository;
pub mod users;

pub use memory::MemoryUserStore;
pub use pool::Database;
pub use repository::{RepositoryError, RepositoryResult, UserStore};
pub use users::{PgUserStore, UserRow};
