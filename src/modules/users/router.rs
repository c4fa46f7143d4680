use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{delete_user, get_me, get_user, get_users, update_user};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_users))
        .route("/me", get(get_me))
        .route(
            "/{id}",
            get(get_user)
                .patch(update_user)
                .put(update_user)
                .delete(delete_user),
        )
}
