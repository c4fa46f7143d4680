use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::model::{
    LoginData, LoginRequest, LoginResponse, LoginUser, RegisterRequestDto, RegisterResponse,
    RegisteredUser,
};
use crate::modules::blogs::model::{
    Blog, BlogData, BlogListData, BlogListResponse, BlogResponse, BlogStatus, CreateBlogDto,
    PaginationMeta, UpdateBlogDto,
};
use crate::modules::status::controller::{DbStatusResponse, ErrorResponse, MessageResponse};
use crate::modules::users::model::{UpdateUserDto, User, UserData, UserResponse, UsersData, UsersResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::status::controller::app_status,
        crate::modules::status::controller::db_status,
        crate::modules::blogs::controller::create_blog,
        crate::modules::blogs::controller::get_blogs,
        crate::modules::blogs::controller::get_blog,
        crate::modules::blogs::controller::update_blog,
        crate::modules::blogs::controller::delete_blog,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_me,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
    ),
    components(
        schemas(
            Blog,
            BlogStatus,
            BlogData,
            BlogResponse,
            BlogListData,
            BlogListResponse,
            PaginationMeta,
            CreateBlogDto,
            UpdateBlogDto,
            User,
            UserData,
            UserResponse,
            UsersData,
            UsersResponse,
            UpdateUserDto,
            RegisterRequestDto,
            RegisterResponse,
            RegisteredUser,
            LoginRequest,
            LoginResponse,
            LoginData,
            LoginUser,
            MessageResponse,
            DbStatusResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Status", description = "Application and database status"),
        (name = "Blogs", description = "API for managing blog posts"),
        (name = "Authentication", description = "User registration and login"),
        (name = "Users", description = "User accounts")
    ),
    info(
        title = "Quill Blog API",
        version = "0.1.0",
        description = "A blog REST API built with Rust, Axum, and MongoDB featuring filtered, paginated listings and JWT-based authentication.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
