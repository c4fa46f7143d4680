use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::{metrics_middleware, render_metrics};
use crate::modules::auth::router::init_auth_router;
use crate::modules::blogs::router::init_blogs_router;
use crate::modules::status::controller::route_not_found;
use crate::modules::status::router::init_status_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .merge(init_status_router())
        .nest(
            "/api",
            Router::new()
                .nest("/blogs", init_blogs_router())
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router()),
        );

    if state.metrics.is_some() {
        router = router.route("/metrics", get(render_metrics));
    }

    router
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
