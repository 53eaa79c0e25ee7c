//! # rbac-models
//!
//! Domain models for RBAC Admin.
//!
//! These types are shared by the server and the client: the server persists
//! and returns them, the client sends and renders them.

pub use rbac_core::traits::Id;

pub mod permission;
pub mod role;
pub mod session;
pub mod user;

pub use permission::{Permission, PermissionSet};
pub use role::Role;
pub use session::{
    CreatedResponse, ErrorBody, LoginRequest, MessageResponse, SessionUser, TokenResponse,
    UpdatedResponse,
};
pub use user::{NewUser, User, UserPatch};
