//! # rbac-auth
//!
//! Authentication and authorization for RBAC Admin.
//!
//! ## Features
//!
//! - Argon2 password hashing
//! - HS256 JWT access tokens
//! - `access_token` cookie and Bearer header transport
//! - Permission checks against the stored permission set of the caller

pub mod cookie;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use cookie::{extract_cookie, CookieConfig};
pub use jwt::{Claims, JwtError, JwtService};
pub use middleware::{AuthError, AuthStrategy, AuthenticatedToken, Authenticator, RequestHeaders};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking,
    PasswordError,
};
pub use permissions::CurrentUser;
