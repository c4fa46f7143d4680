use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::instrument;

use quill_core::AppError;

use super::model::{LoginRequest, LoginResponse, RegisterRequestDto, RegisterResponse};
use super::service::AuthService;
use crate::modules::status::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Invalid input data or duplicate username", body = ErrorResponse),
        (status = 409, description = "User with this email already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = AuthService::register_user(state.db.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            status: "success".to_string(),
            message: "User registered successfully".to_string(),
            data: user,
        }),
    ))
}

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login_user(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let data = AuthService::login_user(state.db.as_ref(), dto, &state.jwt_config).await?;
    Ok(Json(LoginResponse {
        status: "success".to_string(),
        message: "Login successful".to_string(),
        data,
    }))
}
