//! # rbac-queries
//!
//! Table state for the user list.
//!
//! ## Structure
//!
//! - `columns` - The displayed user columns and their labels
//! - `sorts` - Single-key sort state and the row comparator
//! - `filters` - Case-insensitive free-text search
//! - `table` - The table itself: search, then sort, then page
//!
//! ## Example
//!
//! ```
//! use rbac_queries::{UserColumn, UserTable};
//!
//! let mut table = UserTable::new(6);
//! table.set_search("admin");
//! table.sort_by(UserColumn::Username);
//!
//! let view = table.view(&[]);
//! assert_eq!(view.summary(), "Showing 0 to 0 of 0 entries");
//! ```

pub mod columns;
pub mod filters;
pub mod sorts;
pub mod table;

pub use columns::UserColumn;
pub use filters::SearchFilter;
pub use sorts::{SortDirection, SortState};
pub use table::{TableView, UserTable};
