use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tably_core::{
    errors::BookingError,
    models::pricing::{CreatePricingTierRequest, PricingTier},
    pricing,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_tier(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreatePricingTierRequest>,
) -> Result<Json<PricingTier>, AppError> {
    if payload.cost_cents < 0 {
        return Err(AppError(BookingError::Validation(
            "cost_cents must not be negative".to_string(),
        )));
    }

    // Reject ranges colliding with a tier already on file
    let existing =
        tably_db::repositories::pricing::get_tiers_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|t| t.into_model())
            .collect::<Vec<_>>();

    pricing::check_tier_overlap(&existing, payload.min_people, payload.max_people)?;

    let tier = tably_db::repositories::pricing::create_tier(
        &state.db_pool,
        restaurant_id,
        payload.min_people,
        payload.max_people,
        payload.cost_cents,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(tier.into_model()))
}

#[axum::debug_handler]
pub async fn list_tiers(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<PricingTier>>, AppError> {
    let tiers =
        tably_db::repositories::pricing::get_tiers_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?;

    Ok(Json(tiers.into_iter().map(|t| t.into_model()).collect()))
}

#[axum::debug_handler]
pub async fn delete_tier(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = tably_db::repositories::pricing::delete_tier(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    if !deleted {
        return Err(AppError(BookingError::NotFound(format!(
            "Pricing tier with ID {} not found",
            id
        ))));
    }

    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}
