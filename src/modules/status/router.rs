use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{app_status, db_status};

pub fn init_status_router() -> Router<AppState> {
    Router::new()
        .route("/", get(app_status))
        .route("/db-status", get(db_status))
}
