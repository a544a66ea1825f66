use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tably_core::{
    errors::BookingError,
    models::closure::{Closure, CreateClosureRequest},
};
use tably_db::repositories::closure::NewClosure;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_closure(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Json(payload): Json<CreateClosureRequest>,
) -> Result<Json<Closure>, AppError> {
    // Exactly one closure target
    match (payload.date, payload.day_of_week) {
        (Some(_), Some(_)) | (None, None) => {
            return Err(AppError(BookingError::Validation(
                "Provide either a date or a day_of_week, not both".to_string(),
            )));
        }
        _ => {}
    }

    if let Some(day) = payload.day_of_week {
        if !(0..=6).contains(&day) {
            return Err(AppError(BookingError::Validation(
                "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            )));
        }
    }

    if !payload.is_all_day {
        match (payload.start_time, payload.end_time) {
            (Some(start), Some(end)) if start < end => {}
            (Some(_), Some(_)) => {
                return Err(AppError(BookingError::Validation(
                    "start_time must be before end_time".to_string(),
                )));
            }
            _ => {
                return Err(AppError(BookingError::Validation(
                    "Partial closures need both start_time and end_time".to_string(),
                )));
            }
        }
    }

    let closure = tably_db::repositories::closure::create_closure(
        &state.db_pool,
        NewClosure {
            restaurant_id,
            date: payload.date,
            day_of_week: payload.day_of_week,
            is_all_day: payload.is_all_day,
            start_time: if payload.is_all_day { None } else { payload.start_time },
            end_time: if payload.is_all_day { None } else { payload.end_time },
        },
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(closure.into_model()))
}

#[axum::debug_handler]
pub async fn list_closures(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
) -> Result<Json<Vec<Closure>>, AppError> {
    let closures =
        tably_db::repositories::closure::get_closures_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?;

    Ok(Json(closures.into_iter().map(|c| c.into_model()).collect()))
}

#[axum::debug_handler]
pub async fn delete_closure(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let deleted = tably_db::repositories::closure::delete_closure(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    if !deleted {
        return Err(AppError(BookingError::NotFound(format!(
            "Closure with ID {} not found",
            id
        ))));
    }

    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}
