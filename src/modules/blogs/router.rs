use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_blog, delete_blog, get_blog, get_blogs, update_blog};

pub fn init_blogs_router() -> Router<AppState> {
    Router::new().route("/", post(create_blog).get(get_blogs)).route(
        "/{id}",
        get(get_blog)
            .patch(update_blog)
            .put(update_blog)
            .delete(delete_blog),
    )
}
