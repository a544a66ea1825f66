use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveTime, Utc};
use std::sync::Arc;
use tably_core::{
    errors::BookingError,
    models::restaurant::{
        CreateRestaurantRequest, CreateRestaurantResponse, GetRestaurantResponse, SlotMode,
        UpdateRestaurantRequest, UpdateRestaurantResponse, VerifyPasswordRequest,
        VerifyPasswordResponse,
    },
};
use tably_db::repositories::restaurant::{NewRestaurant, RestaurantChanges};
use uuid::Uuid;

use crate::{
    middleware::{auth, error_handling::AppError},
    ApiState,
};

fn default_open() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

fn default_close() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN)
}

#[axum::debug_handler]
pub async fn create_restaurant(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<Json<CreateRestaurantResponse>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError(BookingError::Validation(
            "Restaurant name must not be empty".to_string(),
        )));
    }
    if payload.slot_minutes.is_some_and(|m| m < 1) {
        return Err(AppError(BookingError::Validation(
            "slot_minutes must be at least 1".to_string(),
        )));
    }

    // Hash password if provided
    let password_hash = match &payload.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    // An explicit slot list means fixed mode unless the owner says otherwise
    let slot_mode = payload.slot_mode.unwrap_or(if payload.slots.is_empty() {
        SlotMode::Window
    } else {
        SlotMode::Fixed
    });

    let new = NewRestaurant {
        name: payload.name.trim().to_string(),
        address: payload.address.clone(),
        location: payload.location,
        timezone: payload.timezone.clone().unwrap_or_else(|| "UTC".to_string()),
        currency: payload.currency.clone().unwrap_or_else(|| "EUR".to_string()),
        password_hash,
        flat_deposit_cents: payload.flat_deposit_cents,
        open_time: payload.open_time.unwrap_or_else(default_open),
        close_time: payload.close_time.unwrap_or_else(default_close),
        slot_minutes: payload.slot_minutes.unwrap_or(90),
        slot_mode: slot_mode.as_str().to_string(),
        assignment_mode: payload
            .assignment_mode
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| "automatic".to_string()),
    };

    // Create restaurant in database
    let db_restaurant = tably_db::repositories::restaurant::create_restaurant(&state.db_pool, new)
        .await
        .map_err(BookingError::Database)?;

    // Store fixed candidate slots if provided
    if !payload.slots.is_empty() {
        tably_db::repositories::restaurant::replace_time_slots(
            &state.db_pool,
            db_restaurant.id,
            &payload.slots,
        )
        .await
        .map_err(BookingError::Database)?;
    }

    let response = CreateRestaurantResponse {
        id: db_restaurant.id,
        name: db_restaurant.name,
        created_at: db_restaurant.created_at,
        has_password: db_restaurant.password_hash.is_some(),
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_restaurant(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetRestaurantResponse>, AppError> {
    // Get restaurant from database
    let restaurant = tably_db::repositories::restaurant::get_restaurant_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Restaurant with ID {} not found", id)))?
        .into_model()
        .map_err(BookingError::Database)?;

    // Get fixed candidate slots for restaurant
    let slots = tably_db::repositories::restaurant::get_time_slots(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    let response = GetRestaurantResponse {
        id: restaurant.id,
        name: restaurant.name,
        address: restaurant.address,
        location: restaurant.location,
        timezone: restaurant.timezone,
        currency: restaurant.currency,
        flat_deposit_cents: restaurant.flat_deposit_cents,
        open_time: restaurant.open_time,
        close_time: restaurant.close_time,
        slot_minutes: restaurant.slot_minutes,
        slot_mode: restaurant.slot_mode,
        assignment_mode: restaurant.assignment_mode,
        slots: slots.into_iter().map(|s| s.slot_time).collect(),
        created_at: restaurant.created_at,
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_restaurant(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> Result<Json<UpdateRestaurantResponse>, AppError> {
    // Verify password if provided
    if let Some(password) = &payload.password {
        let is_valid = auth::verify_restaurant_password(&state.db_pool, id, password)
            .await
            .map_err(BookingError::Database)?;

        if !is_valid {
            return Err(AppError(BookingError::Authentication(
                "Invalid password".to_string(),
            )));
        }
    } else {
        // Check if restaurant is password-protected
        let db_restaurant =
            tably_db::repositories::restaurant::get_restaurant_by_id(&state.db_pool, id)
                .await
                .map_err(BookingError::Database)?
                .ok_or_else(|| {
                    BookingError::NotFound(format!("Restaurant with ID {} not found", id))
                })?;

        if db_restaurant.password_hash.is_some() {
            return Err(AppError(BookingError::Authentication(
                "Password required to update this restaurant".to_string(),
            )));
        }
    }

    if payload.slot_minutes.is_some_and(|m| m < 1) {
        return Err(AppError(BookingError::Validation(
            "slot_minutes must be at least 1".to_string(),
        )));
    }

    let changes = RestaurantChanges {
        name: payload.name.clone(),
        address: payload.address.clone(),
        location: payload.location,
        timezone: payload.timezone.clone(),
        currency: payload.currency.clone(),
        flat_deposit_cents: payload.flat_deposit_cents,
        open_time: payload.open_time,
        close_time: payload.close_time,
        slot_minutes: payload.slot_minutes,
        slot_mode: payload.slot_mode.map(|m| m.as_str().to_string()),
        assignment_mode: payload.assignment_mode.map(|m| m.as_str().to_string()),
    };

    tably_db::repositories::restaurant::update_restaurant(&state.db_pool, id, changes)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Restaurant with ID {} not found", id)))?;

    // Replace fixed candidate slots when a new list is given
    if let Some(slots) = &payload.slots {
        tably_db::repositories::restaurant::replace_time_slots(&state.db_pool, id, slots)
            .await
            .map_err(BookingError::Database)?;
    }

    let response = UpdateRestaurantResponse {
        id,
        updated_at: Utc::now(),
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn verify_password(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VerifyPasswordRequest>,
) -> Result<Json<VerifyPasswordResponse>, AppError> {
    let is_valid = auth::verify_restaurant_password(&state.db_pool, id, &payload.password)
        .await
        .map_err(BookingError::Database)?;

    let response = VerifyPasswordResponse { valid: is_valid };

    Ok(Json(response))
}
