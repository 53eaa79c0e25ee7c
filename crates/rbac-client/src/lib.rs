//! # rbac-client
//!
//! Client side of RBAC Admin.
//!
//! - `api` - HTTP client for `/api/v1`
//! - `context` - The session: loading, anonymous or authenticated
//! - `gate` - Page guard deciding between loading, login redirect,
//!   forbidden and render
//! - `affordances` - Which actions the session may offer
//! - `form` - Create and edit forms for users
//! - `directory` - The user list page backed by the table state
//!
//! Every permission check is string membership in the session's
//! permission list. The server enforces the same checks on its own.

pub mod affordances;
pub mod api;
pub mod context;
pub mod directory;
pub mod form;
pub mod gate;

pub use affordances::{Affordances, RowAction};
pub use api::{ApiClient, ClientError, ClientResult};
pub use context::{AuthContext, SessionState};
pub use directory::UserDirectory;
pub use form::UserForm;
pub use gate::{AuthGate, GuardOutcome};
