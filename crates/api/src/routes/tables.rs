use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/restaurants/:id/table-types",
            get(handlers::tables::list_table_types),
        )
        .route(
            "/api/restaurants/:id/table-types",
            post(handlers::tables::create_table_type),
        )
        .route(
            "/api/table-types/:id",
            delete(handlers::tables::delete_table_type),
        )
        .route("/api/restaurants/:id/tables", get(handlers::tables::list_tables))
        .route("/api/restaurants/:id/tables", post(handlers::tables::create_table))
        .route("/api/tables/:id", put(handlers::tables::update_table))
        .route("/api/tables/:id", delete(handlers::tables::delete_table))
}
