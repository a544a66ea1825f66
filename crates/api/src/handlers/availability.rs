//! # Availability Handlers
//!
//! This module contains the diner-facing discovery endpoints: the booking
//! calendar, the bookable slot list for a date, the free tables for one
//! slot, and the deposit quote. Each handler fetches the rows the question
//! needs and runs the pure resolvers from the core crate over them; nothing
//! here mutates state.
//!
//! ## Resolution pipeline
//!
//! The booking screen walks these endpoints in order:
//!
//! 1. The calendar marks closed dates so the date picker can grey them out
//! 2. The slot list enumerates candidate times and drops past, closed, and
//!    fully-booked ones
//! 3. The table list answers "who can seat this party at this slot" and
//!    carries the fallback / exact-match hints
//! 4. The deposit quote prices the party before payment

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::sync::Arc;
use tably_core::{
    availability, closures as closure_rules,
    errors::BookingError,
    models::booking::{
        AvailableTablesResponse, BookableSlotsResponse, CalendarDay, CalendarResponse,
        DepositQuoteResponse,
    },
    models::restaurant::Restaurant,
    pricing, slots as slot_rules,
};
use uuid::Uuid;

use crate::{clock, middleware::error_handling::AppError, ApiState};

/// Longest calendar span one request may ask for.
const MAX_CALENDAR_DAYS: i64 = 90;

async fn fetch_restaurant(state: &ApiState, id: Uuid) -> Result<Restaurant, AppError> {
    let restaurant = tably_db::repositories::restaurant::get_restaurant_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Restaurant with ID {} not found", id)))?
        .into_model()
        .map_err(BookingError::Database)?;

    Ok(restaurant)
}

/// Query parameters for the calendar endpoint
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// First date of the span; defaults to today in the restaurant's timezone
    pub from: Option<NaiveDate>,

    /// Number of days to cover (default 30, capped at 90)
    pub days: Option<i64>,
}

/// Returns the closed/open flag for each date in a span
///
/// # Endpoint
///
/// ```text
/// GET /api/restaurants/:id/calendar?from=2025-06-01&days=30
/// ```
///
/// A date is marked closed when any closure rule matches it, including
/// partial-day rules; the calendar stays conservative and the slot list
/// gives the finer per-time answer.
#[axum::debug_handler]
pub async fn calendar(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let restaurant = fetch_restaurant(&state, restaurant_id).await?;

    let closures =
        tably_db::repositories::closure::get_closures_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|c| c.into_model())
            .collect::<Vec<_>>();

    let start = query
        .from
        .unwrap_or_else(|| clock::local_now(&restaurant.timezone).date());
    let days = query.days.unwrap_or(30).clamp(1, MAX_CALENDAR_DAYS);

    let days = (0..days)
        .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
        .map(|date| CalendarDay {
            date,
            closed: closure_rules::is_closed(&closures, date),
        })
        .collect();

    Ok(Json(CalendarResponse { days }))
}

/// Query parameters for the bookable slots endpoint
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,

    /// Party size the slots must be able to seat (default 1)
    pub party_size: Option<i32>,
}

/// Lists the slot times a diner can book on a date
///
/// # Endpoint
///
/// ```text
/// GET /api/restaurants/:id/slots?date=2025-06-01&party_size=4
/// ```
///
/// Candidate slots come from the restaurant's fixed list or its generated
/// window, per its slot mode. A candidate is dropped when a closure covers
/// it, when it is already past (restaurant-local clock, today only), or
/// when no table can seat the party, unless the restaurant runs without
/// configured tables, in which case every remaining slot is bookable.
#[axum::debug_handler]
pub async fn bookable_slots(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<BookableSlotsResponse>, AppError> {
    let party_size = query.party_size.unwrap_or(1);
    if party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let restaurant = fetch_restaurant(&state, restaurant_id).await?;

    let fixed: Vec<NaiveTime> =
        tably_db::repositories::restaurant::get_time_slots(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|s| s.slot_time)
            .collect();

    let closures =
        tably_db::repositories::closure::get_closures_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|c| c.into_model())
            .collect::<Vec<_>>();

    let tables =
        tably_db::repositories::table::get_tables_with_types(&state.db_pool, restaurant_id, false)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|t| t.into_model())
            .collect::<Result<Vec<_>, _>>()
            .map_err(BookingError::Database)?;

    let day_reservations = tably_db::repositories::reservation::get_reservations_for_date(
        &state.db_pool,
        restaurant_id,
        query.date,
        false,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|r| r.into_model())
    .collect::<Vec<_>>();

    let now = clock::local_now(&restaurant.timezone);

    let candidates: Vec<NaiveTime> = slot_rules::candidate_slots(&restaurant, &fixed)
        .into_iter()
        .filter(|slot| !closure_rules::is_closed_at(&closures, query.date, *slot))
        .collect();

    let slots = slot_rules::bookable_slots(
        &candidates,
        query.date,
        now,
        &tables,
        &day_reservations,
        party_size,
    );

    Ok(Json(BookableSlotsResponse {
        date: query.date,
        slots,
    }))
}

/// Query parameters for the available tables endpoint
#[derive(Debug, Deserialize)]
pub struct AvailableTablesQuery {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub party_size: i32,

    /// Reservation being edited, exempted from the conflict set so a table
    /// move does not collide with itself
    pub exclude_reservation: Option<Uuid>,
}

/// Lists the free tables for a party at one slot
///
/// # Endpoint
///
/// ```text
/// GET /api/restaurants/:id/tables/available?date=2025-06-01&time=18:00&party_size=4
/// ```
#[axum::debug_handler]
pub async fn available_tables(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<AvailableTablesQuery>,
) -> Result<Json<AvailableTablesResponse>, AppError> {
    if query.party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let tables =
        tably_db::repositories::table::get_tables_with_types(&state.db_pool, restaurant_id, false)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|t| t.into_model())
            .collect::<Result<Vec<_>, _>>()
            .map_err(BookingError::Database)?;

    let reservations = tably_db::repositories::reservation::get_reservations_for_slot(
        &state.db_pool,
        restaurant_id,
        query.date,
        query.time,
    )
    .await
    .map_err(BookingError::Database)?
    .into_iter()
    .map(|r| r.into_model())
    .collect::<Vec<_>>();

    let resolved = availability::available_tables(
        &tables,
        &reservations,
        query.party_size,
        query.exclude_reservation,
    );

    let response = AvailableTablesResponse {
        fallback: resolved.is_fallback(),
        exact_match: resolved.has_exact_match(query.party_size),
        tables: resolved.into_tables(),
    };

    Ok(Json(response))
}

/// Query parameters for the deposit quote endpoint
#[derive(Debug, Deserialize)]
pub struct DepositQuery {
    pub party_size: i32,
}

/// Quotes the deposit a party would pay, in minor currency units
///
/// # Endpoint
///
/// ```text
/// GET /api/restaurants/:id/deposit?party_size=4
/// ```
#[axum::debug_handler]
pub async fn deposit_quote(
    State(state): State<Arc<ApiState>>,
    Path(restaurant_id): Path<Uuid>,
    Query(query): Query<DepositQuery>,
) -> Result<Json<DepositQuoteResponse>, AppError> {
    if query.party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let restaurant = fetch_restaurant(&state, restaurant_id).await?;

    let tiers =
        tably_db::repositories::pricing::get_tiers_by_restaurant(&state.db_pool, restaurant_id)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|t| t.into_model())
            .collect::<Vec<_>>();

    let deposit_cents =
        pricing::deposit_for(restaurant.flat_deposit_cents, &tiers, query.party_size);

    Ok(Json(DepositQuoteResponse {
        deposit_cents,
        currency: restaurant.currency,
    }))
}
