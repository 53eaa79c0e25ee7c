//! # rbac-services
//!
//! Business logic for RBAC Admin.
//!
//! Services check the caller's permissions, validate input against the
//! user contract, and then talk to the `UserStore`. Every operation
//! returns an `RbacResult` so the API layer can turn failures into status
//! codes.

pub mod contract;
pub mod sessions;
pub mod users;

pub use contract::UserContract;
pub use sessions::{ensure_admin, resolve_current_user, LoginOutcome, LoginService};
pub use users::{
    CreateUserService, DeleteUserService, ReadUsersService, UpdateUserService, UserUpdate,
};
