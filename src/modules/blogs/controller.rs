use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use quill_core::{AppError, FilterRequest};

use crate::modules::blogs::model::{
    BlogListParams, BlogListResponse, BlogResponse, CreateBlogDto, UpdateBlogDto,
};
use crate::modules::blogs::service::BlogService;
use crate::modules::status::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::{ParsedQuery, ValidatedJson};

/// Create a blog post
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = CreateBlogDto,
    responses(
        (status = 201, description = "Blog created successfully", body = BlogResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn create_blog(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateBlogDto>,
) -> Result<(StatusCode, Json<BlogResponse>), AppError> {
    let blog = BlogService::create_blog(state.db.as_ref(), dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(BlogResponse::new(blog).with_message("Blog Created Successfully")),
    ))
}

/// List blog posts with filtering, sorting, field selection and pagination
#[utoipa::path(
    get,
    path = "/api/blogs",
    params(BlogListParams),
    responses(
        (status = 200, description = "A page of blogs", body = BlogListResponse),
        (status = 400, description = "Malformed filter value", body = ErrorResponse),
        (status = 404, description = "This page does not exist", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state, params))]
pub async fn get_blogs(
    State(state): State<AppState>,
    ParsedQuery(params): ParsedQuery<Vec<(String, String)>>,
) -> Result<Json<BlogListResponse>, AppError> {
    let request = FilterRequest::from_pairs(params);
    let page = BlogService::get_blogs(state.db.as_ref(), &state.query, &request).await?;
    Ok(Json(BlogListResponse::from(page)))
}

/// Get a blog post by id
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 200, description = "Blog found", body = BlogResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No Blog found with that ID", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let blog = BlogService::get_blog(state.db.as_ref(), &id).await?;
    Ok(Json(BlogResponse::new(blog)))
}

/// Edit a blog post (PATCH and PUT both apply a partial update)
#[utoipa::path(
    patch,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    request_body = UpdateBlogDto,
    responses(
        (status = 200, description = "Blog updated", body = BlogResponse),
        (status = 400, description = "Invalid input data", body = ErrorResponse),
        (status = 404, description = "No Blog found with that ID", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateBlogDto>,
) -> Result<Json<BlogResponse>, AppError> {
    let blog = BlogService::update_blog(state.db.as_ref(), &id, dto).await?;
    Ok(Json(
        BlogResponse::new(blog).with_message("Blog Successfully Edited"),
    ))
}

/// Delete a blog post
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog id")),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 404, description = "No Blog found with that ID", body = ErrorResponse)
    ),
    tag = "Blogs"
)]
#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    BlogService::delete_blog(state.db.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
