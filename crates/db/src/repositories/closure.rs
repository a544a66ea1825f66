use crate::models::DbClosure;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub struct NewClosure {
    pub restaurant_id: Uuid,
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i16>,
    pub is_all_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

pub async fn create_closure(pool: &Pool<Postgres>, new: NewClosure) -> Result<DbClosure> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating closure: id={}, restaurant_id={}, all_day={}",
        id,
        new.restaurant_id,
        new.is_all_day
    );

    let closure = sqlx::query_as::<_, DbClosure>(
        r#"
        INSERT INTO restaurant_closures
            (id, restaurant_id, date, day_of_week, is_all_day, start_time, end_time, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, restaurant_id, date, day_of_week, is_all_day, start_time, end_time, created_at
        "#,
    )
    .bind(id)
    .bind(new.restaurant_id)
    .bind(new.date)
    .bind(new.day_of_week)
    .bind(new.is_all_day)
    .bind(new.start_time)
    .bind(new.end_time)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(closure)
}

pub async fn get_closures_by_restaurant(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
) -> Result<Vec<DbClosure>> {
    let closures = sqlx::query_as::<_, DbClosure>(
        r#"
        SELECT id, restaurant_id, date, day_of_week, is_all_day, start_time, end_time, created_at
        FROM restaurant_closures
        WHERE restaurant_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    Ok(closures)
}

pub async fn delete_closure(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM restaurant_closures
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
