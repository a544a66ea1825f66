use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/restaurants/:id/closures",
            get(handlers::closures::list_closures),
        )
        .route(
            "/api/restaurants/:id/closures",
            post(handlers::closures::create_closure),
        )
        .route("/api/closures/:id", delete(handlers::closures::delete_closure))
}
