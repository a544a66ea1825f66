use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/restaurants/:id/calendar",
            get(handlers::availability::calendar),
        )
        .route(
            "/api/restaurants/:id/slots",
            get(handlers::availability::bookable_slots),
        )
        .route(
            "/api/restaurants/:id/tables/available",
            get(handlers::availability::available_tables),
        )
        .route(
            "/api/restaurants/:id/deposit",
            get(handlers::availability::deposit_quote),
        )
}
