//! # Reservation Handlers
//!
//! This module contains the booking commit pipeline and the owner-side
//! reservation management endpoints.
//!
//! ## Booking guard
//!
//! `POST /api/reservations` runs a fixed sequence of checks where the first
//! failure wins:
//!
//! 1. Validation: required fields, a real candidate slot, not in the past,
//!    and a seating decision (chosen table, automatic assignment, or
//!    fallback mode)
//! 2. Restaurant closed at that date and time
//! 3. Duplicate booking by the same guest for the same slot
//! 4. Table no longer available, via a fresh availability pass; automatic
//!    mode assigns the smallest qualifying table here
//!
//! Only then is the deposit charged; a declined payment aborts with no
//! database write. The insert itself re-checks the conflict set inside a
//! SERIALIZABLE transaction, so two racing requests cannot both commit the
//! same table or the same guest. Notifications go out after the commit and
//! are fire-and-forget: a messaging failure is logged, never rolled back.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tably_core::{
    availability,
    closures as closure_rules,
    errors::BookingError,
    integrations::BookingNotice,
    models::reservation::{
        CreateReservationRequest, CreateReservationResponse, Reservation, ReservationResponse,
        UpdateReservationRequest,
    },
    models::restaurant::{AssignmentMode, Restaurant},
    models::table::TableStatus,
    pricing, slots as slot_rules,
};
use tably_db::repositories::reservation::{InsertOutcome, NewReservation, ReservationChanges};
use uuid::Uuid;

use crate::{clock, middleware::error_handling::AppError, ApiState};

async fn fetch_restaurant(state: &ApiState, id: Uuid) -> Result<Restaurant, AppError> {
    let restaurant = tably_db::repositories::restaurant::get_restaurant_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Restaurant with ID {} not found", id)))?
        .into_model()
        .map_err(BookingError::Database)?;

    Ok(restaurant)
}

fn spawn_notification<F>(task: F)
where
    F: std::future::Future<Output = eyre::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = task.await {
            tracing::error!("Notification dispatch failed: {}", e);
        }
    });
}

/// Commits a reservation after the full guard sequence
#[axum::debug_handler]
pub async fn create_reservation(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateReservationRequest>,
) -> Result<Json<CreateReservationResponse>, AppError> {
    // --- 1. Validation -----------------------------------------------------
    let guest_name = payload.guest_name.trim();
    let guest_email = payload.guest_email.trim();

    if guest_name.is_empty() {
        return Err(AppError(BookingError::Validation(
            "Guest name must not be empty".to_string(),
        )));
    }
    if guest_email.is_empty() || !guest_email.contains('@') {
        return Err(AppError(BookingError::Validation(
            "A valid guest email is required".to_string(),
        )));
    }
    if payload.party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let restaurant = fetch_restaurant(&state, payload.restaurant_id).await?;

    let fixed: Vec<chrono::NaiveTime> =
        tably_db::repositories::restaurant::get_time_slots(&state.db_pool, payload.restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|s| s.slot_time)
            .collect();

    let candidates = slot_rules::candidate_slots(&restaurant, &fixed);
    if !candidates.contains(&payload.slot_time) {
        return Err(AppError(BookingError::Validation(format!(
            "{} is not a bookable slot time for this restaurant",
            payload.slot_time
        ))));
    }

    let now = clock::local_now(&restaurant.timezone);
    if payload.date < now.date() || (payload.date == now.date() && payload.slot_time < now.time())
    {
        return Err(AppError(BookingError::Validation(
            "Cannot book a slot in the past".to_string(),
        )));
    }

    let tables = tably_db::repositories::table::get_tables_with_types(
        &state.db_pool,
        payload.restaurant_id,
        false,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|t| t.into_model())
    .collect::<Result<Vec<_>, _>>()
    .map_err(BookingError::Database)?;

    // A seating decision must exist: a chosen table, automatic assignment,
    // or fallback mode (no tables configured at all)
    let has_active_tables = tables
        .iter()
        .any(|t| t.table.status == TableStatus::Active);
    if payload.table_id.is_none()
        && has_active_tables
        && restaurant.assignment_mode == AssignmentMode::Manual
    {
        return Err(AppError(BookingError::Validation(
            "table_id is required for this restaurant".to_string(),
        )));
    }

    // --- 2. Closure check --------------------------------------------------
    let closures = tably_db::repositories::closure::get_closures_by_restaurant(
        &state.db_pool,
        payload.restaurant_id,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|c| c.into_model())
    .collect::<Vec<_>>();

    if closure_rules::is_closed_at(&closures, payload.date, payload.slot_time) {
        return Err(AppError(BookingError::RestaurantClosed(payload.date)));
    }

    // --- 3. Duplicate check ------------------------------------------------
    let duplicate = tably_db::repositories::reservation::find_duplicate(
        &state.db_pool,
        payload.restaurant_id,
        guest_email,
        payload.date,
        payload.slot_time,
    )
    .await
    .map_err(BookingError::Database)?;

    if duplicate.is_some() {
        return Err(AppError(BookingError::DuplicateBooking {
            date: payload.date,
            time: payload.slot_time,
        }));
    }

    // --- 4. Availability pass and table assignment -------------------------
    let slot_reservations = tably_db::repositories::reservation::get_reservations_for_slot(
        &state.db_pool,
        payload.restaurant_id,
        payload.date,
        payload.slot_time,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|r| r.into_model())
    .collect::<Vec<_>>();

    let resolved =
        availability::available_tables(&tables, &slot_reservations, payload.party_size, None);

    let table_id = if resolved.is_fallback() {
        // No configured tables: bookings carry no table at all
        None
    } else if let Some(chosen) = payload.table_id {
        if !resolved.contains_table(chosen) {
            return Err(AppError(BookingError::TableNoLongerAvailable {
                date: payload.date,
                time: payload.slot_time,
            }));
        }
        Some(chosen)
    } else if restaurant.assignment_mode == AssignmentMode::Automatic {
        // Smallest qualifying table; the resolver orders them that way
        match resolved.into_tables().first() {
            Some(first) => Some(first.table.id),
            None => {
                return Err(AppError(BookingError::TableNoLongerAvailable {
                    date: payload.date,
                    time: payload.slot_time,
                }));
            }
        }
    } else {
        return Err(AppError(BookingError::Validation(
            "table_id is required for this restaurant".to_string(),
        )));
    };

    // --- 5. Pricing and payment --------------------------------------------
    let tiers = tably_db::repositories::pricing::get_tiers_by_restaurant(
        &state.db_pool,
        payload.restaurant_id,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|t| t.into_model())
    .collect::<Vec<_>>();

    let deposit_cents =
        pricing::deposit_for(restaurant.flat_deposit_cents, &tiers, payload.party_size);

    let payment_ref = if deposit_cents > 0 {
        let description = format!(
            "Reservation deposit: {} on {} at {}",
            restaurant.name, payload.date, payload.slot_time
        );
        let reference = state
            .payments
            .charge(deposit_cents, &restaurant.currency, &description)
            .await
            .map_err(|e| BookingError::PaymentFailed(e.to_string()))?;
        Some(reference)
    } else {
        None
    };

    // --- 6. Guarded insert -------------------------------------------------
    let outcome = tably_db::repositories::reservation::insert_guarded(
        &state.db_pool,
        NewReservation {
            restaurant_id: payload.restaurant_id,
            table_id,
            guest_name: guest_name.to_string(),
            guest_email: guest_email.to_string(),
            party_size: payload.party_size,
            date: payload.date,
            slot_time: payload.slot_time,
            deposit_cents,
            payment_ref,
        },
    )
    .await
    .map_err(BookingError::Database)?;

    let reservation = match outcome {
        InsertOutcome::Inserted(reservation) => reservation.into_model(),
        InsertOutcome::GuestDuplicate => {
            return Err(AppError(BookingError::DuplicateBooking {
                date: payload.date,
                time: payload.slot_time,
            }));
        }
        InsertOutcome::TableTaken => {
            return Err(AppError(BookingError::TableNoLongerAvailable {
                date: payload.date,
                time: payload.slot_time,
            }));
        }
    };

    // --- 7. Fire-and-forget notification -----------------------------------
    let notice = BookingNotice {
        restaurant_name: restaurant.name,
        guest_name: reservation.guest_name.clone(),
        guest_email: reservation.guest_email.clone(),
        date: reservation.date,
        slot_time: reservation.slot_time,
        party_size: reservation.party_size,
    };
    let notifier = Arc::clone(&state.notifier);
    spawn_notification(async move { notifier.reservation_confirmed(&notice).await });

    let response = CreateReservationResponse {
        id: reservation.id,
        table_id: reservation.table_id,
        date: reservation.date,
        slot_time: reservation.slot_time,
        party_size: reservation.party_size,
        deposit_cents: reservation.deposit_cents,
        payment_ref: reservation.payment_ref,
    };

    Ok(Json(response))
}

/// Query parameters for the reservation list endpoint
#[derive(Debug, Deserialize)]
pub struct ListReservationsQuery {
    pub date: NaiveDate,
    pub include_cancelled: Option<bool>,
}

#[axum::debug_handler]
pub async fn list_reservations(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let reservations = tably_db::repositories::reservation::get_reservations_for_date(
        &state.db_pool,
        restaurant_id,
        query.date,
        query.include_cancelled.unwrap_or(false),
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(
        reservations
            .into_iter()
            .map(|r| ReservationResponse::from(r.into_model()))
            .collect(),
    ))
}

/// Applies owner-side edits: seen/attended flags, cancellation, table moves
///
/// A table move gets its own availability pass with the reservation itself
/// exempted from the conflict set, so moving within the same slot works.
#[axum::debug_handler]
pub async fn update_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let current: Reservation =
        tably_db::repositories::reservation::get_reservation_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Reservation with ID {} not found", id))
            })?
            .into_model();

    if let Some(new_table) = payload.table_id {
        if current.table_id != Some(new_table) {
            let tables = tably_db::repositories::table::get_tables_with_types(
                &state.db_pool,
                current.restaurant_id,
                false,
            )
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|t| t.into_model())
            .collect::<Result<Vec<_>, _>>()
            .map_err(BookingError::Database)?;

            let slot_reservations =
                tably_db::repositories::reservation::get_reservations_for_slot(
                    &state.db_pool,
                    current.restaurant_id,
                    current.date,
                    current.slot_time,
                )
                .await
                .map_err(BookingError::Database)?
                .into_iter()
                .map(|r| r.into_model())
                .collect::<Vec<_>>();

            let resolved = availability::available_tables(
                &tables,
                &slot_reservations,
                current.party_size,
                Some(current.id),
            );

            if !resolved.contains_table(new_table) {
                return Err(AppError(BookingError::TableNoLongerAvailable {
                    date: current.date,
                    time: current.slot_time,
                }));
            }
        }
    }

    let updated = tably_db::repositories::reservation::update_reservation(
        &state.db_pool,
        id,
        ReservationChanges {
            table_id: payload.table_id,
            seen: payload.seen,
            attended: payload.attended,
            cancelled: payload.cancelled,
        },
    )
    .await;

    let reservation = match updated {
        Ok(Some(reservation)) => reservation.into_model(),
        Ok(None) => {
            return Err(AppError(BookingError::NotFound(format!(
                "Reservation with ID {} not found",
                id
            ))));
        }
        // Backstop for a move racing another booking onto the same table
        Err(e) if tably_db::constraint_name(&e) == Some("uniq_table_booking") => {
            return Err(AppError(BookingError::TableNoLongerAvailable {
                date: current.date,
                time: current.slot_time,
            }));
        }
        Err(e) => return Err(AppError(BookingError::Database(e))),
    };

    Ok(Json(ReservationResponse::from(reservation)))
}

/// Cancels a reservation on the diner's behalf
///
/// Idempotent: cancelling an already-cancelled reservation returns it
/// unchanged and sends nothing.
#[axum::debug_handler]
pub async fn cancel_reservation(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    let current: Reservation =
        tably_db::repositories::reservation::get_reservation_by_id(&state.db_pool, id)
            .await
            .map_err(BookingError::Database)?
            .ok_or_else(|| {
                BookingError::NotFound(format!("Reservation with ID {} not found", id))
            })?
            .into_model();

    if current.cancelled {
        return Ok(Json(ReservationResponse::from(current)));
    }

    let cancelled = tably_db::repositories::reservation::cancel_reservation(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Reservation with ID {} not found", id)))?
        .into_model();

    let restaurant = fetch_restaurant(&state, cancelled.restaurant_id).await?;

    let notice = BookingNotice {
        restaurant_name: restaurant.name,
        guest_name: cancelled.guest_name.clone(),
        guest_email: cancelled.guest_email.clone(),
        date: cancelled.date,
        slot_time: cancelled.slot_time,
        party_size: cancelled.party_size,
    };
    let notifier = Arc::clone(&state.notifier);
    spawn_notification(async move { notifier.reservation_cancelled(&notice).await });

    Ok(Json(ReservationResponse::from(cancelled)))
}
