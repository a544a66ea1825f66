use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/restaurants", post(handlers::restaurant::create_restaurant))
        .route("/api/restaurants/:id", get(handlers::restaurant::get_restaurant))
        .route("/api/restaurants/:id", put(handlers::restaurant::update_restaurant))
        .route(
            "/api/restaurants/:id/verify",
            post(handlers::restaurant::verify_password),
        )
}
