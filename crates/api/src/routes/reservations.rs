use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/reservations",
            post(handlers::reservations::create_reservation),
        )
        .route(
            "/api/restaurants/:id/reservations",
            get(handlers::reservations::list_reservations),
        )
        .route(
            "/api/reservations/:id",
            put(handlers::reservations::update_reservation),
        )
        .route(
            "/api/reservations/:id",
            delete(handlers::reservations::cancel_reservation),
        )
}
