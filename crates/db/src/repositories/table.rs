use crate::models::{DbTable, DbTableType, DbTableWithType};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

// Table type repository

pub async fn create_table_type(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    name: &str,
    capacity: i32,
) -> Result<DbTableType> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating table type: id={}, restaurant_id={}, capacity={}",
        id,
        restaurant_id,
        capacity
    );

    let table_type = sqlx::query_as::<_, DbTableType>(
        r#"
        INSERT INTO table_types (id, restaurant_id, name, capacity, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, restaurant_id, name, capacity, created_at
        "#,
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(name)
    .bind(capacity)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(table_type)
}

pub async fn get_table_types_by_restaurant(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
) -> Result<Vec<DbTableType>> {
    let table_types = sqlx::query_as::<_, DbTableType>(
        r#"
        SELECT id, restaurant_id, name, capacity, created_at
        FROM table_types
        WHERE restaurant_id = $1
        ORDER BY capacity ASC, name ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    Ok(table_types)
}

pub async fn get_table_type_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbTableType>> {
    let table_type = sqlx::query_as::<_, DbTableType>(
        r#"
        SELECT id, restaurant_id, name, capacity, created_at
        FROM table_types
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(table_type)
}

pub async fn count_tables_for_type(pool: &Pool<Postgres>, table_type_id: Uuid) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM tables
        WHERE table_type_id = $1
        "#,
    )
    .bind(table_type_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

pub async fn delete_table_type(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM table_types
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// Dining table repository

pub async fn create_table(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    table_type_id: Uuid,
    name: &str,
) -> Result<DbTable> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating table: id={}, restaurant_id={}, type={}",
        id,
        restaurant_id,
        table_type_id
    );

    let table = sqlx::query_as::<_, DbTable>(
        r#"
        INSERT INTO tables (id, restaurant_id, table_type_id, name, status, created_at)
        VALUES ($1, $2, $3, $4, 'active', $5)
        RETURNING id, restaurant_id, table_type_id, name, status, created_at
        "#,
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(table_type_id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(table)
}

pub async fn get_table_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTable>> {
    let table = sqlx::query_as::<_, DbTable>(
        r#"
        SELECT id, restaurant_id, table_type_id, name, status, created_at
        FROM tables
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(table)
}

/// Fetches tables joined with their types. Availability always works on the
/// active set; owner screens pass `include_archived` to show history.
pub async fn get_tables_with_types(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    include_archived: bool,
) -> Result<Vec<DbTableWithType>> {
    let tables = sqlx::query_as::<_, DbTableWithType>(
        r#"
        SELECT t.id, t.restaurant_id, t.table_type_id, t.name, t.status, t.created_at,
               tt.name AS type_name, tt.capacity, tt.created_at AS type_created_at
        FROM tables t
        JOIN table_types tt ON tt.id = t.table_type_id
        WHERE t.restaurant_id = $1
          AND (t.status = 'active' OR $2)
        ORDER BY tt.capacity ASC, t.name ASC
        "#,
    )
    .bind(restaurant_id)
    .bind(include_archived)
    .fetch_all(pool)
    .await?;

    Ok(tables)
}

pub async fn update_table(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    table_type_id: Option<Uuid>,
    status: Option<&str>,
) -> Result<Option<DbTable>> {
    let Some(current) = get_table_by_id(pool, id).await? else {
        return Ok(None);
    };

    let updated = sqlx::query_as::<_, DbTable>(
        r#"
        UPDATE tables
        SET name = $2, table_type_id = $3, status = $4
        WHERE id = $1
        RETURNING id, restaurant_id, table_type_id, name, status, created_at
        "#,
    )
    .bind(id)
    .bind(name.unwrap_or(&current.name))
    .bind(table_type_id.unwrap_or(current.table_type_id))
    .bind(status.unwrap_or(&current.status))
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

/// Outcome of removing a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRemoval {
    /// No reservation ever referenced the table; the row is gone.
    Deleted,
    /// Reservation history exists; the table was archived instead.
    Archived,
}

/// Removes a table, hard-deleting only when no reservation has ever
/// referenced it so history keeps resolving.
pub async fn delete_or_archive_table(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<TableRemoval>> {
    let mut tx = pool.begin().await?;

    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (SELECT 1 FROM tables WHERE id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if !exists {
        return Ok(None);
    }

    let reservation_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM reservations
        WHERE table_id = $1
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    let removal = if reservation_count == 0 {
        sqlx::query(
            r#"
            DELETE FROM tables
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        TableRemoval::Deleted
    } else {
        sqlx::query(
            r#"
            UPDATE tables
            SET status = 'archived'
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        TableRemoval::Archived
    };

    tx.commit().await?;

    tracing::debug!("Table {} removed: {:?}", id, removal);
    Ok(Some(removal))
}
