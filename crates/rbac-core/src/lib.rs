//! # rbac-core
//!
//! Core types, traits, and utilities for RBAC Admin.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types and the `RbacResult` alias
//! - The `Id` primary key type
//! - Page arithmetic shared by the server and the user table
//! - Configuration types and loading

pub mod config;
pub mod error;
pub mod pagination;
pub mod traits;

pub use error::*;
pub use pagination::*;
pub use traits::*;
