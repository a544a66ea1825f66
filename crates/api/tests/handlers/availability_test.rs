use axum::http::StatusCode;
use axum::Json;
use axum_test::TestServer;
use chrono::{NaiveTime, Utc};
use mockall::predicate;
use tably_core::{
    availability,
    closures as closure_rules,
    errors::BookingError,
    models::booking::{AvailableTablesResponse, BookableSlotsResponse},
    slots as slot_rules,
};
use tably_db::models::{DbClosure, DbTimeSlot};
use uuid::Uuid;

use crate::test_utils::{
    future_date, reservation_row, restaurant_row, table_row, time, TestContext,
};
use tably_api::handlers::availability::{AvailableTablesQuery, SlotsQuery};
use tably_api::middleware::error_handling::AppError;

// Replays the slot listing over the mock repositories: candidate slots from
// the restaurant's slot mode, minus closed, past and fully-booked times.
async fn test_bookable_slots_wrapper(
    ctx: &mut TestContext,
    restaurant_id: Uuid,
    query: SlotsQuery,
) -> Result<Json<BookableSlotsResponse>, AppError> {
    // Validate the party size before touching the repositories
    let party_size = query.party_size.unwrap_or(1);
    if party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let restaurant = ctx
        .restaurant_repo
        .get_restaurant_by_id(restaurant_id)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Restaurant with ID {} not found",
                restaurant_id
            )))
        })?
        .into_model()?;

    // Fetch everything the filter runs over
    let fixed: Vec<NaiveTime> = ctx
        .restaurant_repo
        .get_time_slots(restaurant_id)
        .await?
        .into_iter()
        .map(|s| s.slot_time)
        .collect();

    let closures = ctx
        .closure_repo
        .get_closures_by_restaurant(restaurant_id)
        .await?
        .into_iter()
        .map(|c| c.into_model())
        .collect::<Vec<_>>();

    let tables = ctx
        .table_repo
        .get_tables_with_types(restaurant_id, false)
        .await?
        .into_iter()
        .map(|t| t.into_model())
        .collect::<Result<Vec<_>, _>>()?;

    let day_reservations = ctx
        .reservation_repo
        .get_reservations_for_date(restaurant_id, query.date, false)
        .await?
        .into_iter()
        .map(|r| r.into_model())
        .collect::<Vec<_>>();

    // The test restaurants all run in UTC
    let now = Utc::now().naive_utc();

    // Enumerate the candidates, then drop the closed ones
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

// Replays the free-table listing for one slot, including the fallback and
// exact-match hints the booking screen shows.
async fn test_available_tables_wrapper(
    ctx: &mut TestContext,
    restaurant_id: Uuid,
    query: AvailableTablesQuery,
) -> Result<Json<AvailableTablesResponse>, AppError> {
    if query.party_size < 1 {
        return Err(AppError(BookingError::Validation(
            "party_size must be at least 1".to_string(),
        )));
    }

    let tables = ctx
        .table_repo
        .get_tables_with_types(restaurant_id, false)
        .await?
        .into_iter()
        .map(|t| t.into_model())
        .collect::<Result<Vec<_>, _>>()?;

    let reservations = ctx
        .reservation_repo
        .get_reservations_for_slot(restaurant_id, query.date, query.time)
        .await?
        .into_iter()
        .map(|r| r.into_model())
        .collect::<Vec<_>>();

    let resolved = availability::available_tables(
        &tables,
        &reservations,
        query.party_size,
        query.exclude_reservation,
    );

    Ok(Json(AvailableTablesResponse {
        fallback: resolved.is_fallback(),
        exact_match: resolved.has_exact_match(query.party_size),
        tables: resolved.into_tables(),
    }))
}

#[tokio::test]
async fn test_bookable_slots_zero_party_rejected() {
    let mut ctx = TestContext::new();

    let query = SlotsQuery {
        date: future_date(),
        party_size: Some(0),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, Uuid::new_v4(), query).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Validation(_) => {} // Expected
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_bookable_slots_unknown_restaurant() {
    let mut ctx = TestContext::new();
    let missing_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .with(predicate::eq(missing_id))
        .returning(|_| Ok(None));

    let query = SlotsQuery {
        date: future_date(),
        party_size: None,
    };

    let result = test_bookable_slots_wrapper(&mut ctx, missing_id, query).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {} // Expected
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_bookable_slots_window_grid() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let date = future_date();

    // 12:00 to 22:00 in 90-minute steps
    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|_| Ok(vec![]));
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(|_| Ok(vec![]));
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(|restaurant_id, _| Ok(vec![table_row(restaurant_id, "T1", 4)]));
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(|_, _, _| Ok(vec![]));

    let query = SlotsQuery {
        date,
        party_size: None,
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert_eq!(response.0.date, date);
    assert_eq!(
        response.0.slots,
        vec![
            time(12, 0),
            time(13, 30),
            time(15, 0),
            time(16, 30),
            time(18, 0),
            time(19, 30),
        ]
    );
}

#[tokio::test]
async fn test_bookable_slots_fixed_mode_sorts_the_list() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| {
            let mut row = restaurant_row(id);
            row.slot_mode = "fixed".to_string();
            Ok(Some(row))
        });
    // Stored out of order and with a duplicate
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|restaurant_id| {
            let slot = |t: NaiveTime| DbTimeSlot {
                id: Uuid::new_v4(),
                restaurant_id,
                slot_time: t,
                created_at: Utc::now(),
            };
            Ok(vec![
                slot(time(19, 0)),
                slot(time(17, 0)),
                slot(time(21, 0)),
                slot(time(19, 0)),
            ])
        });
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(|_| Ok(vec![]));
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(|restaurant_id, _| Ok(vec![table_row(restaurant_id, "T1", 4)]));
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(|_, _, _| Ok(vec![]));

    let query = SlotsQuery {
        date: future_date(),
        party_size: Some(2),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    assert_eq!(
        result.unwrap().0.slots,
        vec![time(17, 0), time(19, 0), time(21, 0)]
    );
}

#[tokio::test]
async fn test_bookable_slots_all_day_closure_empties_the_list() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let date = future_date();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|_| Ok(vec![]));
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(move |restaurant_id| {
            Ok(vec![DbClosure {
                id: Uuid::new_v4(),
                restaurant_id,
                date: Some(date),
                day_of_week: None,
                is_all_day: true,
                start_time: None,
                end_time: None,
                created_at: Utc::now(),
            }])
        });
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(|restaurant_id, _| Ok(vec![table_row(restaurant_id, "T1", 4)]));
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(|_, _, _| Ok(vec![]));

    let query = SlotsQuery {
        date,
        party_size: Some(2),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert_eq!(response.0.date, date);
    assert!(response.0.slots.is_empty());
}

#[tokio::test]
async fn test_bookable_slots_partial_closure_is_half_open() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let date = future_date();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|_| Ok(vec![]));
    // Closed for a private lunch event, 12:00 to 15:00
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(move |restaurant_id| {
            Ok(vec![DbClosure {
                id: Uuid::new_v4(),
                restaurant_id,
                date: Some(date),
                day_of_week: None,
                is_all_day: false,
                start_time: Some(time(12, 0)),
                end_time: Some(time(15, 0)),
                created_at: Utc::now(),
            }])
        });
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(|restaurant_id, _| Ok(vec![table_row(restaurant_id, "T1", 4)]));
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(|_, _, _| Ok(vec![]));

    let query = SlotsQuery {
        date,
        party_size: Some(2),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    // The closure end is exclusive, so the 15:00 slot itself survives
    assert_eq!(
        result.unwrap().0.slots,
        vec![time(15, 0), time(16, 30), time(18, 0), time(19, 30)]
    );
}

#[tokio::test]
async fn test_bookable_slots_fully_booked_slot_dropped() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let date = future_date();
    let table = table_row(restaurant_id, "T1", 4);
    let table_id = table.id;

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|_| Ok(vec![]));
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(|_| Ok(vec![]));
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(move |_, _| Ok(vec![table.clone()]));
    // The only table is taken at 18:00
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(move |restaurant_id, date, _| {
            Ok(vec![reservation_row(
                restaurant_id,
                Some(table_id),
                date,
                time(18, 0),
            )])
        });

    let query = SlotsQuery {
        date,
        party_size: Some(2),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    let slots = result.unwrap().0.slots;
    assert!(!slots.contains(&time(18, 0)));
    assert_eq!(
        slots,
        vec![time(12, 0), time(13, 30), time(15, 0), time(16, 30), time(19, 30)]
    );
}

#[tokio::test]
async fn test_bookable_slots_without_tables_keeps_candidates() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_get_time_slots()
        .returning(|_| Ok(vec![]));
    ctx.closure_repo
        .expect_get_closures_by_restaurant()
        .returning(|_| Ok(vec![]));
    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(|_, _| Ok(vec![]));
    ctx.reservation_repo
        .expect_get_reservations_for_date()
        .returning(|_, _, _| Ok(vec![]));

    // No configured tables puts the restaurant in fallback mode, where
    // capacity never filters a slot
    let query = SlotsQuery {
        date: future_date(),
        party_size: Some(10),
    };

    let result = test_bookable_slots_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().0.slots.len(), 6);
}

#[tokio::test]
async fn test_available_tables_reports_exact_match() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let six_top = table_row(restaurant_id, "Six", 6);
    let two_top = table_row(restaurant_id, "Two", 2);
    let two_top_id = two_top.id;

    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(move |_, _| Ok(vec![six_top.clone(), two_top.clone()]));
    ctx.reservation_repo
        .expect_get_reservations_for_slot()
        .returning(|_, _, _| Ok(vec![]));

    let query = AvailableTablesQuery {
        date: future_date(),
        time: time(18, 0),
        party_size: 2,
        exclude_reservation: None,
    };

    let result = test_available_tables_wrapper(&mut ctx, restaurant_id, query).await;

    assert!(result.is_ok());
    let response = result.unwrap();
    assert!(!response.0.fallback);
    assert!(response.0.exact_match);
    // Both tables seat the party, smallest first
    assert_eq!(response.0.tables.len(), 2);
    assert_eq!(response.0.tables[0].table.id, two_top_id);
    assert_eq!(response.0.tables[0].table_type.capacity, 2);
}

#[tokio::test]
async fn test_available_tables_excludes_reservation_being_moved() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();
    let date = future_date();
    let table = table_row(restaurant_id, "T1", 4);
    let table_id = table.id;
    let existing = reservation_row(restaurant_id, Some(table_id), date, time(18, 0));
    let existing_id = existing.id;

    ctx.table_repo
        .expect_get_tables_with_types()
        .returning(move |_, _| Ok(vec![table.clone()]));
    ctx.reservation_repo
        .expect_get_reservations_for_slot()
        .returning(move |_, _, _| Ok(vec![existing.clone()]));

    // Without the exemption the only table is taken
    let blocked = test_available_tables_wrapper(
        &mut ctx,
        restaurant_id,
        AvailableTablesQuery {
            date,
            time: time(18, 0),
            party_size: 2,
            exclude_reservation: None,
        },
    )
    .await
    .unwrap();
    assert!(blocked.0.tables.is_empty());

    // Editing that very reservation frees its own table
    let freed = test_available_tables_wrapper(
        &mut ctx,
        restaurant_id,
        AvailableTablesQuery {
            date,
            time: time(18, 0),
            party_size: 2,
            exclude_reservation: Some(existing_id),
        },
    )
    .await
    .unwrap();
    assert_eq!(freed.0.tables.len(), 1);
    assert_eq!(freed.0.tables[0].table.id, table_id);
}

// party_size is validated before the first query, so the real route can run
// against a pool that never connects.
#[tokio::test]
async fn test_deposit_quote_rejects_zero_party() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server
        .get(&format!("/api/restaurants/{}/deposit", Uuid::new_v4()))
        .add_query_param("party_size", 0)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
