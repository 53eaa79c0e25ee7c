//! Core error types for RBAC Admin

use std::collections::BTreeMap;
use thiserror::Error;

/// Standard Result type for RBAC operations
pub type RbacResult<T> = Result<T, RbacError>;

/// Core error type shared by the service, store and API layers
#[derive(Error, Debug)]
pub enum RbacError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RbacError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        RbacError::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        RbacError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        RbacError::Forbidden {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        RbacError::Conflict {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            RbacError::NotFound { .. } => 404,
            RbacError::Unauthorized { .. } => 401,
            RbacError::Forbidden { .. } => 403,
            RbacError::Validation(_) => 422,
            RbacError::BadRequest(_) => 400,
            RbacError::Conflict { .. } => 409,
            RbacError::Database(_) | RbacError::Internal(_) | RbacError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::NotFound { .. } => "not_found",
            RbacError::Unauthorized { .. } => "unauthorized",
            RbacError::Forbidden { .. } => "forbidden",
            RbacError::Validation(_) => "validation_failed",
            RbacError::BadRequest(_) => "bad_request",
            RbacError::Conflict { .. } => "conflict",
            RbacError::Database(_) => "database_error",
            RbacError::Internal(_) => "internal_error",
            RbacError::Config(_) => "configuration_error",
        }
    }

    /// Message suitable for an API client, without the variant prefix
    pub fn public_message(&self) -> String {
        match self {
            RbacError::NotFound { entity, .. } => format!("{} not found", entity),
            RbacError::Unauthorized { message }
            | RbacError::Forbidden { message }
            | RbacError::Conflict { message } => message.clone(),
            RbacError::Validation(errors) => errors.full_messages().join(", "),
            RbacError::BadRequest(msg)
            | RbacError::Database(msg)
            | RbacError::Internal(msg)
            | RbacError::Config(msg) => msg.clone(),
        }
    }
}

/// Field-level validation errors.
///
/// Fields are kept in a sorted map so messages come out in a stable order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }

    /// Turn a non-empty collection into an error
    pub fn into_result(self) -> RbacResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(RbacError::Validation(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(RbacError::not_found("User", "id", 3).status_code(), 404);
        assert_eq!(RbacError::unauthorized("No token provided").status_code(), 401);
        assert_eq!(RbacError::forbidden("Insufficient permissions").status_code(), 403);
        assert_eq!(RbacError::conflict("taken").status_code(), 409);
        assert_eq!(RbacError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message() {
        assert_eq!(
            RbacError::not_found("User", "id", 3).public_message(),
            "User not found"
        );
        assert_eq!(
            RbacError::forbidden("Insufficient permissions").public_message(),
            "Insufficient permissions"
        );
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("username", "can't be blank");
        errors.add_base("Something went wrong");
        assert!(errors.has_error("username"));
        assert!(!errors.has_error("email"));
        assert_eq!(
            errors.full_messages(),
            vec!["Something went wrong", "username can't be blank"]
        );

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationErrors::new();
        a.add("password", "is too short");
        let mut b = ValidationErrors::new();
        b.add("password", "can't be blank");
        b.add("email", "is invalid");
        a.merge(b);

        assert_eq!(a.get("password").map(Vec::len), Some(2));
        assert!(a.has_error("email"));
    }
}
