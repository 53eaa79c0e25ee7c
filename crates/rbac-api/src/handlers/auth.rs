//! Session API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use rbac_models::{LoginRequest, MessageResponse, TokenResponse};
use rbac_services::LoginService;

use crate::error::ApiResult;
use crate::extractors::{AppState, AuthenticatedUser};

/// Exchange credentials for an access token
///
/// POST /api/v1/auth/login
///
/// The token is returned in the body and set as the `access_token` cookie.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;

    let outcome = LoginService::new(state.store.as_ref(), &state.jwt)
        .call(&request)
        .await?;

    let cookie = state.cookie().build_cookie(&outcome.access_token);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(TokenResponse::bearer(outcome.access_token)),
    ))
}

/// The current session
///
/// GET /api/v1/auth/check
pub async fn check(user: AuthenticatedUser) -> impl IntoResponse {
    Json(user.to_session())
}

/// Clear the session cookie
///
/// POST /api/v1/auth/logout
///
/// Tokens are stateless, so this only tells the browser to drop the cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("Session cookie cleared");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.cookie().build_clear_cookie())],
        Json(MessageResponse::new("Logged out successfully")),
    )
}
