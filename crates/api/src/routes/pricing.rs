use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/restaurants/:id/pricing-tiers",
            get(handlers::pricing::list_tiers),
        )
        .route(
            "/api/restaurants/:id/pricing-tiers",
            post(handlers::pricing::create_tier),
        )
        .route("/api/pricing-tiers/:id", delete(handlers::pricing::delete_tier))
}
