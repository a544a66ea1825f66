use crate::models::DbPricingTier;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_tier(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    min_people: i32,
    max_people: i32,
    cost_cents: i64,
) -> Result<DbPricingTier> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating pricing tier: id={}, restaurant_id={}, range={}-{}",
        id,
        restaurant_id,
        min_people,
        max_people
    );

    let tier = sqlx::query_as::<_, DbPricingTier>(
        r#"
        INSERT INTO booking_cost_tiers (id, restaurant_id, min_people, max_people, cost_cents, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, restaurant_id, min_people, max_people, cost_cents, created_at
        "#,
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(min_people)
    .bind(max_people)
    .bind(cost_cents)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(tier)
}

pub async fn get_tiers_by_restaurant(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
) -> Result<Vec<DbPricingTier>> {
    let tiers = sqlx::query_as::<_, DbPricingTier>(
        r#"
        SELECT id, restaurant_id, min_people, max_people, cost_cents, created_at
        FROM booking_cost_tiers
        WHERE restaurant_id = $1
        ORDER BY min_people ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    Ok(tiers)
}

pub async fn delete_tier(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM booking_cost_tiers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
