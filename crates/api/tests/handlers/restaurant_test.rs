use axum::http::StatusCode;
use axum::Json;
use axum_test::TestServer;
use chrono::Utc;
use mockall::predicate;
use serde_json::json;
use tably_core::{
    errors::BookingError,
    models::restaurant::{UpdateRestaurantRequest, UpdateRestaurantResponse},
};
use tably_db::repositories::restaurant::RestaurantChanges;
use uuid::Uuid;

use crate::test_utils::{restaurant_row, time, TestContext};
use tably_api::middleware::error_handling::AppError;

// Replays the update flow over the mock repository: a stored password must
// be presented and verified before any change is written.
async fn test_update_restaurant_wrapper(
    ctx: &mut TestContext,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> Result<Json<UpdateRestaurantResponse>, AppError> {
    if let Some(password) = &payload.password {
        // mockall wants a 'static password
        let password: &'static str = Box::leak(password.clone().into_boxed_str());
        let is_valid = ctx.restaurant_repo.verify_password(id, password).await?;
        if !is_valid {
            return Err(AppError(BookingError::Authentication(
                "Invalid password".to_string(),
            )));
        }
    } else {
        let row = ctx
            .restaurant_repo
            .get_restaurant_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError(BookingError::NotFound(format!(
                    "Restaurant with ID {} not found",
                    id
                )))
            })?;

        if row.password_hash.is_some() {
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

    ctx.restaurant_repo
        .update_restaurant(id, changes)
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NotFound(format!(
                "Restaurant with ID {} not found",
                id
            )))
        })?;

    if let Some(slots) = payload.slots {
        ctx.restaurant_repo.replace_time_slots(id, slots).await?;
    }

    Ok(Json(UpdateRestaurantResponse {
        id,
        updated_at: Utc::now(),
    }))
}

fn update_payload() -> UpdateRestaurantRequest {
    UpdateRestaurantRequest {
        name: None,
        address: None,
        location: None,
        timezone: None,
        currency: None,
        flat_deposit_cents: None,
        open_time: None,
        close_time: None,
        slot_minutes: None,
        slot_mode: None,
        assignment_mode: None,
        slots: None,
        password: None,
    }
}

#[tokio::test]
async fn test_update_restaurant_requires_password_when_protected() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| {
            let mut row = restaurant_row(id);
            row.password_hash = Some("$argon2id$stored".to_string());
            Ok(Some(row))
        });

    // A protected restaurant must never be written without the password
    ctx.restaurant_repo
        .expect_update_restaurant()
        .times(0)
        .returning(|id, _| Ok(Some(restaurant_row(id))));

    let mut payload = update_payload();
    payload.name = Some("New Name".to_string());

    let result = test_update_restaurant_wrapper(&mut ctx, restaurant_id, payload).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Authentication(_) => {} // Expected
        e => panic!("Expected Authentication error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_update_restaurant_wrong_password_rejected() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_verify_password()
        .with(predicate::eq(restaurant_id), predicate::eq("wrong-password"))
        .returning(|_, _| Ok(false));

    ctx.restaurant_repo
        .expect_update_restaurant()
        .times(0)
        .returning(|id, _| Ok(Some(restaurant_row(id))));

    let mut payload = update_payload();
    payload.name = Some("New Name".to_string());
    payload.password = Some("wrong-password".to_string());

    let result = test_update_restaurant_wrapper(&mut ctx, restaurant_id, payload).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Authentication(_) => {} // Expected
        e => panic!("Expected Authentication error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_update_restaurant_unknown_restaurant() {
    let mut ctx = TestContext::new();
    let missing_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .with(predicate::eq(missing_id))
        .returning(|_| Ok(None));

    let result = test_update_restaurant_wrapper(&mut ctx, missing_id, update_payload()).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::NotFound(_) => {} // Expected
        e => panic!("Expected NotFound error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_update_restaurant_zero_slot_minutes_rejected() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_update_restaurant()
        .times(0)
        .returning(|id, _| Ok(Some(restaurant_row(id))));

    let mut payload = update_payload();
    payload.slot_minutes = Some(0);

    let result = test_update_restaurant_wrapper(&mut ctx, restaurant_id, payload).await;

    assert!(result.is_err());
    match result.unwrap_err().0 {
        BookingError::Validation(_) => {} // Expected
        e => panic!("Expected Validation error, got: {:?}", e),
    }
}

#[tokio::test]
async fn test_update_restaurant_unprotected_applies_changes() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    // The default row carries no password, so no credential is needed
    ctx.restaurant_repo
        .expect_get_restaurant_by_id()
        .returning(move |id| Ok(Some(restaurant_row(id))));
    ctx.restaurant_repo
        .expect_update_restaurant()
        .returning(|id, changes| {
            assert_eq!(changes.name.as_deref(), Some("Nuova Trattoria"));
            Ok(Some(restaurant_row(id)))
        });

    let mut payload = update_payload();
    payload.name = Some("Nuova Trattoria".to_string());

    let result = test_update_restaurant_wrapper(&mut ctx, restaurant_id, payload).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().0.id, restaurant_id);
}

#[tokio::test]
async fn test_update_restaurant_correct_password_replaces_slots() {
    let mut ctx = TestContext::new();
    let restaurant_id = Uuid::new_v4();

    ctx.restaurant_repo
        .expect_verify_password()
        .with(predicate::eq(restaurant_id), predicate::eq("password123"))
        .returning(|_, _| Ok(true));
    ctx.restaurant_repo
        .expect_update_restaurant()
        .returning(|id, _| Ok(Some(restaurant_row(id))));
    // The new fixed list replaces the stored one wholesale
    ctx.restaurant_repo
        .expect_replace_time_slots()
        .with(
            predicate::eq(restaurant_id),
            predicate::eq(vec![time(18, 0), time(20, 30)]),
        )
        .returning(|_, _| Ok(()));

    let mut payload = update_payload();
    payload.password = Some("password123".to_string());
    payload.slots = Some(vec![time(18, 0), time(20, 30)]);

    let result = test_update_restaurant_wrapper(&mut ctx, restaurant_id, payload).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "tably");
}

#[tokio::test]
async fn test_version_reports_package_version() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server.get("/version").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server.get("/api/nonexistent").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_restaurant_rejects_blank_name() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server
        .post("/api/restaurants")
        .json(&json!({
            "name": "   ",
            "address": "Via Roma 1, Milano",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_restaurant_rejects_zero_slot_minutes() {
    let ctx = TestContext::new();
    let server = TestServer::new(tably_api::app(ctx.build_state())).unwrap();

    let response = server
        .post("/api/restaurants")
        .json(&json!({
            "name": "Trattoria da Anna",
            "address": "Via Roma 1, Milano",
            "slot_minutes": 0,
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
