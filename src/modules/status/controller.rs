use axum::{Json, extract::OriginalUri, extract::State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use quill_core::AppError;

use crate::state::AppState;

/// Error body rendered by the error pipeline. `details` only appears in
/// development.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// `fail` for client errors, `error` for server errors
    #[schema(example = "fail")]
    pub status: String,
    pub message: String,
    pub details: Option<Vec<String>>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DbStatusResponse {
    pub message: String,
    pub database_name: String,
}

/// Application liveness
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The application is running", body = MessageResponse)),
    tag = "Status"
)]
pub async fn app_status() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "The Blog Application is Running!!".to_string(),
    })
}

/// Database connectivity
#[utoipa::path(
    get,
    path = "/db-status",
    responses(
        (status = 200, description = "The database answered a ping", body = DbStatusResponse),
        (status = 500, description = "The database is unreachable", body = ErrorResponse)
    ),
    tag = "Status"
)]
#[instrument(skip(state))]
pub async fn db_status(State(state): State<AppState>) -> Result<Json<DbStatusResponse>, AppError> {
    let database_name = state.db.ping().await?;
    Ok(Json(DbStatusResponse {
        message: "MongoDB connection is active".to_string(),
        database_name,
    }))
}

/// Fallback for every unmatched route.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    let target = uri
        .path_and_query()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    AppError::not_found(anyhow::anyhow!("Can't find {} on this server!", target))
}
