//! Users API handlers
//!
//! A single user is addressed either as `/api/v1/users?id=N` or as
//! `/api/v1/users/N`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rbac_core::traits::Id;
use rbac_core::RbacError;
use rbac_models::{CreatedResponse, MessageResponse, NewUser, Permission, UpdatedResponse, UserPatch};
use rbac_services::{CreateUserService, DeleteUserService, ReadUsersService, UpdateUserService};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, AuthenticatedUser};

/// `?id=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct UserIdQuery {
    pub id: Option<String>,
}

fn parse_id(raw: &str) -> ApiResult<Id> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid user id '{}'", raw)))
}

fn required_id(query: &UserIdQuery) -> ApiResult<Id> {
    match query.id.as_deref() {
        Some(raw) => parse_id(raw),
        None => Err(ApiError::bad_request("Missing user id")),
    }
}

fn require(user: &AuthenticatedUser, permission: Permission) -> ApiResult<()> {
    user.require(permission).map_err(RbacError::from)?;
    Ok(())
}

/// List users, or fetch one with `?id=N`
///
/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Response> {
    let service = ReadUsersService::new(state.store.as_ref(), &user);

    match query.id.as_deref() {
        Some(raw) => {
            let id = parse_id(raw)?;
            Ok(Json(service.find(id).await?).into_response())
        }
        None => Ok(Json(service.list().await?).into_response()),
    }
}

/// Get a single user
///
/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let found = ReadUsersService::new(state.store.as_ref(), &user)
        .find(id)
        .await?;
    Ok(Json(found))
}

/// Create a new user
///
/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    require(&user, Permission::CanCreateUser)?;
    let Json(body) = payload?;

    let created = CreateUserService::new(state.store.as_ref(), &user)
        .with_contract(state.contract.clone())
        .call(body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "User created successfully".to_string(),
            user_id: created.id,
        }),
    ))
}

async fn update(
    state: AppState,
    user: AuthenticatedUser,
    id: Id,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<UpdatedResponse>> {
    let Json(patch) = payload?;

    let update = UpdateUserService::new(state.store.as_ref(), &user)
        .with_contract(state.contract.clone())
        .call(id, patch)
        .await?;

    Ok(Json(UpdatedResponse {
        message: "User updated successfully".to_string(),
        updated_attributes: update.changed,
    }))
}

/// Update the user given by `?id=N`
///
/// PUT /api/v1/users
pub async fn update_user_by_query(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UserIdQuery>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<UpdatedResponse>> {
    require(&user, Permission::CanUpdateUser)?;
    let id = required_id(&query)?;
    update(state, user, id, payload).await
}

/// Update a user
///
/// PUT /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> ApiResult<Json<UpdatedResponse>> {
    require(&user, Permission::CanUpdateUser)?;
    let id = parse_id(&id)?;
    update(state, user, id, payload).await
}

async fn delete(state: AppState, user: AuthenticatedUser, id: Id) -> ApiResult<Json<MessageResponse>> {
    DeleteUserService::new(state.store.as_ref(), &user)
        .call(id)
        .await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Delete the user given by `?id=N`
///
/// DELETE /api/v1/users
pub async fn delete_user_by_query(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UserIdQuery>,
) -> ApiResult<Json<MessageResponse>> {
    require(&user, Permission::CanDeleteUser)?;
    let id = required_id(&query)?;
    delete(state, user, id).await
}

/// Delete a user
///
/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    require(&user, Permission::CanDeleteUser)?;
    let id = parse_id(&id)?;
    delete(state, user, id).await
}
