use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use quill_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::status::controller::ErrorResponse;
use crate::modules::users::model::{UpdateUserDto, UserResponse, UsersResponse};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = UsersResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, AppError> {
    let users = UserService::get_users(state.db.as_ref()).await?;
    Ok(Json(UsersResponse::from(users)))
}

/// Get the profile of the token holder
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "The account no longer exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(state.db.as_ref(), auth_user.user_id()).await?;
    Ok(Json(UserResponse::new(user)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No User found with that ID", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get_user(state.db.as_ref(), &id).await?;
    Ok(Json(UserResponse::new(user)))
}

/// Update your own account (PATCH and PUT both apply a partial update)
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid input data or duplicate value", body = ErrorResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "No User found with that ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.ensure_owner(&id)?;
    let user = UserService::update_user(state.db.as_ref(), &id, dto).await?;
    Ok(Json(UserResponse::new(user)))
}

/// Delete your own account
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "No User found with that ID", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    auth_user.ensure_owner(&id)?;
    UserService::delete_user(state.db.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
