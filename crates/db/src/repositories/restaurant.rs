use crate::models::{DbRestaurant, DbTimeSlot};
use argon2::{Argon2, PasswordVerifier};
use chrono::{NaiveTime, Utc};
use eyre::{eyre, Result};
use sqlx::{Pool, Postgres};
use tably_core::models::restaurant::Coordinates;
use uuid::Uuid;

/// Column values for a new restaurant row, resolved by the caller
/// (defaults applied, password already hashed).
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    pub timezone: String,
    pub currency: String,
    pub password_hash: Option<String>,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_minutes: i32,
    pub slot_mode: String,
    pub assignment_mode: String,
}

/// Field updates for an existing restaurant; `None` leaves a column as is.
#[derive(Default)]
pub struct RestaurantChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<Coordinates>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
    pub slot_mode: Option<String>,
    pub assignment_mode: Option<String>,
}

pub async fn create_restaurant(
    pool: &Pool<Postgres>,
    new: NewRestaurant,
) -> Result<DbRestaurant> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating restaurant: id={}, name={}, has_password={}, timezone={}",
        id,
        new.name,
        new.password_hash.is_some(),
        new.timezone
    );

    let restaurant = sqlx::query_as::<_, DbRestaurant>(
        r#"
        INSERT INTO restaurants (
            id, name, address, latitude, longitude, timezone, currency,
            password_hash, flat_deposit_cents, open_time, close_time,
            slot_minutes, slot_mode, assignment_mode, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING id, name, address, latitude, longitude, timezone, currency,
                  password_hash, flat_deposit_cents, open_time, close_time,
                  slot_minutes, slot_mode, assignment_mode, created_at
        "#,
    )
    .bind(id)
    .bind(&new.name)
    .bind(&new.address)
    .bind(new.location.map(|c| c.latitude))
    .bind(new.location.map(|c| c.longitude))
    .bind(&new.timezone)
    .bind(&new.currency)
    .bind(&new.password_hash)
    .bind(new.flat_deposit_cents)
    .bind(new.open_time)
    .bind(new.close_time)
    .bind(new.slot_minutes)
    .bind(&new.slot_mode)
    .bind(&new.assignment_mode)
    .bind(now)
    .fetch_one(pool)
    .await?;

    tracing::debug!("Restaurant created successfully: id={}", id);
    Ok(restaurant)
}

pub async fn get_restaurant_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbRestaurant>> {
    tracing::debug!("Getting restaurant by id: {}", id);

    let restaurant = sqlx::query_as::<_, DbRestaurant>(
        r#"
        SELECT id, name, address, latitude, longitude, timezone, currency,
               password_hash, flat_deposit_cents, open_time, close_time,
               slot_minutes, slot_mode, assignment_mode, created_at
        FROM restaurants
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(restaurant)
}

pub async fn update_restaurant(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: RestaurantChanges,
) -> Result<Option<DbRestaurant>> {
    let Some(current) = get_restaurant_by_id(pool, id).await? else {
        return Ok(None);
    };

    let (latitude, longitude) = match changes.location {
        Some(c) => (Some(c.latitude), Some(c.longitude)),
        None => (current.latitude, current.longitude),
    };

    let updated = sqlx::query_as::<_, DbRestaurant>(
        r#"
        UPDATE restaurants
        SET name = $2, address = $3, latitude = $4, longitude = $5,
            timezone = $6, currency = $7, flat_deposit_cents = $8,
            open_time = $9, close_time = $10, slot_minutes = $11,
            slot_mode = $12, assignment_mode = $13
        WHERE id = $1
        RETURNING id, name, address, latitude, longitude, timezone, currency,
                  password_hash, flat_deposit_cents, open_time, close_time,
                  slot_minutes, slot_mode, assignment_mode, created_at
        "#,
    )
    .bind(id)
    .bind(changes.name.unwrap_or(current.name))
    .bind(changes.address.unwrap_or(current.address))
    .bind(latitude)
    .bind(longitude)
    .bind(changes.timezone.unwrap_or(current.timezone))
    .bind(changes.currency.unwrap_or(current.currency))
    .bind(changes.flat_deposit_cents.or(current.flat_deposit_cents))
    .bind(changes.open_time.unwrap_or(current.open_time))
    .bind(changes.close_time.unwrap_or(current.close_time))
    .bind(changes.slot_minutes.unwrap_or(current.slot_minutes))
    .bind(changes.slot_mode.unwrap_or(current.slot_mode))
    .bind(changes.assignment_mode.unwrap_or(current.assignment_mode))
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

pub async fn verify_password(pool: &Pool<Postgres>, id: Uuid, password: &str) -> Result<bool> {
    let restaurant = get_restaurant_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Restaurant not found"))?;

    match restaurant.password_hash {
        Some(hash) => {
            let parsed_hash = argon2::PasswordHash::new(&hash)
                .map_err(|e| eyre!("Invalid password hash: {}", e))?;
            let is_valid = Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok();
            Ok(is_valid)
        }
        None => Ok(true), // If no password is set, consider any password valid
    }
}

pub async fn get_time_slots(pool: &Pool<Postgres>, restaurant_id: Uuid) -> Result<Vec<DbTimeSlot>> {
    let slots = sqlx::query_as::<_, DbTimeSlot>(
        r#"
        SELECT id, restaurant_id, slot_time, created_at
        FROM time_slots
        WHERE restaurant_id = $1
        ORDER BY slot_time ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// Replaces a restaurant's fixed slot list wholesale.
pub async fn replace_time_slots(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    slots: &[NaiveTime],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM time_slots
        WHERE restaurant_id = $1
        "#,
    )
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;

    for slot in slots {
        sqlx::query(
            r#"
            INSERT INTO time_slots (id, restaurant_id, slot_time, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (restaurant_id, slot_time) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(restaurant_id)
        .bind(slot)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
