//! # rbac-api
//!
//! JSON API for RBAC Admin.
//!
//! - `POST /api/v1/auth/login`, `GET /api/v1/auth/check`, `POST /api/v1/auth/logout`
//! - `GET|POST|PUT|DELETE /api/v1/users` (single user via `?id=N` or `/users/{id}`)
//!
//! Errors are returned as `{"error": "<message>"}`.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ApiResult};
pub use extractors::{AppState, AuthenticatedUser};
pub use routes::{not_found, router};
