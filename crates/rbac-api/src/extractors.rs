//! Axum extractors for API handlers

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use rbac_auth::{Authenticator, CookieConfig, CurrentUser, JwtService, RequestHeaders};
use rbac_core::config::AppConfig;
use rbac_core::RbacError;
use rbac_db::UserStore;
use rbac_services::{resolve_current_user, UserContract};
use std::sync::Arc;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub jwt: Arc<JwtService>,
    pub authenticator: Arc<Authenticator>,
    pub contract: UserContract,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        let jwt = Arc::new(JwtService::new(
            config.auth.jwt_secret.as_bytes(),
            config.token_lifetime_seconds(),
        ));
        let authenticator = Arc::new(Authenticator::new(
            jwt.clone(),
            CookieConfig::from_config(&config.auth),
        ));

        Self {
            store,
            jwt,
            authenticator,
            contract: UserContract::new(config.auth.password_min_length),
        }
    }

    pub fn cookie(&self) -> &CookieConfig {
        self.authenticator.cookie()
    }
}

/// Collect the headers the authenticator looks at. Repeated `Cookie`
/// headers are joined; values that are not visible ASCII are skipped.
pub fn request_headers(headers: &HeaderMap) -> RequestHeaders {
    RequestHeaders::from_pairs(
        headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?))),
    )
}

/// Authenticated user extractor
///
/// Validates the access token and loads the caller from the store.
pub struct AuthenticatedUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = app_state
            .authenticator
            .authenticate(&request_headers(&parts.headers))
            .map_err(RbacError::from)?;

        let user = resolve_current_user(app_state.store.as_ref(), &token).await?;
        Ok(AuthenticatedUser(user))
    }
}

impl std::ops::Deref for AuthenticatedUser {
    type Target = CurrentUser;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
