//! Core types shared by models and stores

/// Primary key type
pub type Id = i64;
