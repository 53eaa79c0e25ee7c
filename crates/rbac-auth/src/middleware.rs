//! Request authentication
//!
//! Finds the access token on a request, validates it and hands back the
//! identity it names. Loading the user and checking permissions is left to
//! the caller, which owns the user store.

use crate::cookie::{extract_cookie, CookieConfig};
use crate::jwt::{extract_bearer_token, JwtError, JwtService};

use rbac_core::traits::Id;
use rbac_core::RbacError;
use std::sync::Arc;
use thiserror::Error;

/// Authentication errors. The messages are sent to clients verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token provided")]
    NoToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token payload is missing required fields")]
    MissingClaims,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl From<AuthError> for RbacError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => RbacError::forbidden(err.to_string()),
            _ => RbacError::unauthorized(err.to_string()),
        }
    }
}

/// Where to look for the access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// `access_token` cookie
    Cookie,
    /// `Authorization: Bearer` header
    Bearer,
}

/// Identity carried by a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedToken {
    pub user_id: Id,
    pub username: String,
    pub role: String,
}

/// Request headers relevant for authentication
#[derive(Debug, Default, Clone)]
pub struct RequestHeaders {
    pub authorization: Option<String>,
    pub cookie: Option<String>,
}

impl RequestHeaders {
    /// Create from header name/value pairs. Names are case-insensitive,
    /// the first `Authorization` wins and repeated `Cookie` headers are
    /// joined with `; `.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Self::default();

        for (name, value) in pairs {
            let value = value.as_ref();
            match name.as_ref().to_ascii_lowercase().as_str() {
                "authorization" if headers.authorization.is_none() => {
                    headers.authorization = Some(value.to_string());
                }
                "cookie" => match &mut headers.cookie {
                    Some(cookie) => {
                        cookie.push_str("; ");
                        cookie.push_str(value);
                    }
                    None => headers.cookie = Some(value.to_string()),
                },
                _ => {}
            }
        }

        headers
    }
}

/// Validates access tokens found on requests
#[derive(Clone)]
pub struct Authenticator {
    jwt: Arc<JwtService>,
    cookie: CookieConfig,
    strategies: Vec<AuthStrategy>,
}

impl Authenticator {
    /// Cookie first, then Bearer header
    pub fn new(jwt: Arc<JwtService>, cookie: CookieConfig) -> Self {
        Self {
            jwt,
            cookie,
            strategies: vec![AuthStrategy::Cookie, AuthStrategy::Bearer],
        }
    }

    pub fn with_strategies(mut self, strategies: Vec<AuthStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    pub fn cookie(&self) -> &CookieConfig {
        &self.cookie
    }

    /// The first token found by the configured strategies
    pub fn find_token(&self, headers: &RequestHeaders) -> Option<String> {
        self.strategies.iter().find_map(|strategy| match strategy {
            AuthStrategy::Cookie => headers
                .cookie
                .as_deref()
                .and_then(|c| extract_cookie(c, &self.cookie.name)),
            AuthStrategy::Bearer => headers
                .authorization
                .as_deref()
                .and_then(extract_bearer_token)
                .map(str::to_string),
        })
    }

    /// Authenticate a request from its headers
    pub fn authenticate(&self, headers: &RequestHeaders) -> Result<AuthenticatedToken, AuthError> {
        let token = self.find_token(headers).ok_or(AuthError::NoToken)?;

        let claims = self.jwt.validate_token(&token).map_err(|e| {
            tracing::warn!(error = %e, "Rejected access token");
            match e {
                JwtError::Expired => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let user_id: Id = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        match (claims.username, claims.role) {
            (Some(username), Some(role)) if !username.is_empty() && !role.is_empty() => {
                Ok(AuthenticatedToken {
                    user_id,
                    username,
                    role,
                })
            }
            _ => Err(AuthError::MissingClaims),
        }
    }
}
