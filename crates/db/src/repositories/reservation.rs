use crate::models::DbReservation;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Values for a reservation row, resolved by the caller (table assignment
/// and deposit already decided).
pub struct NewReservation {
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
    pub deposit_cents: i64,
    pub payment_ref: Option<String>,
}

/// Result of a guarded insert. The unique indexes are the authoritative
/// signal; these variants name which one fired.
pub enum InsertOutcome {
    Inserted(DbReservation),
    /// Another live reservation holds the same table for this slot.
    TableTaken,
    /// The same guest already holds a live reservation for this slot.
    GuestDuplicate,
}

pub async fn get_reservation_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, restaurant_id, table_id, guest_name, guest_email, party_size,
               date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        FROM reservations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

/// Live reservations for one slot, the conflict set the availability
/// resolver works on.
pub async fn get_reservations_for_slot(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    date: NaiveDate,
    slot_time: NaiveTime,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, restaurant_id, table_id, guest_name, guest_email, party_size,
               date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        FROM reservations
        WHERE restaurant_id = $1 AND date = $2 AND slot_time = $3 AND cancelled = FALSE
        "#,
    )
    .bind(restaurant_id)
    .bind(date)
    .bind(slot_time)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

pub async fn get_reservations_for_date(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    date: NaiveDate,
    include_cancelled: bool,
) -> Result<Vec<DbReservation>> {
    let reservations = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, restaurant_id, table_id, guest_name, guest_email, party_size,
               date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        FROM reservations
        WHERE restaurant_id = $1 AND date = $2
          AND (cancelled = FALSE OR $3)
        ORDER BY slot_time ASC, created_at ASC
        "#,
    )
    .bind(restaurant_id)
    .bind(date)
    .bind(include_cancelled)
    .fetch_all(pool)
    .await?;

    Ok(reservations)
}

/// Looks for a live reservation by the same guest for the same slot.
/// Emails compare case-insensitively.
pub async fn find_duplicate(
    pool: &Pool<Postgres>,
    restaurant_id: Uuid,
    guest_email: &str,
    date: NaiveDate,
    slot_time: NaiveTime,
) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        SELECT id, restaurant_id, table_id, guest_name, guest_email, party_size,
               date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        FROM reservations
        WHERE restaurant_id = $1 AND lower(guest_email) = lower($2)
          AND date = $3 AND slot_time = $4 AND cancelled = FALSE
        "#,
    )
    .bind(restaurant_id)
    .bind(guest_email)
    .bind(date)
    .bind(slot_time)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}

/// Inserts a reservation inside a SERIALIZABLE transaction, re-checking the
/// conflict set before writing. Concurrent commits that slip past the
/// re-check land on the partial unique indexes instead of double-booking.
pub async fn insert_guarded(pool: &Pool<Postgres>, new: NewReservation) -> Result<InsertOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Inserting reservation: id={}, restaurant_id={}, date={}, slot={}",
        id,
        new.restaurant_id,
        new.date,
        new.slot_time
    );

    let mut tx = pool.begin().await?;

    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut *tx)
        .await?;

    // Re-check in guard order: guest duplicate first, then table conflict
    let duplicate: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservations
            WHERE restaurant_id = $1 AND lower(guest_email) = lower($2)
              AND date = $3 AND slot_time = $4 AND cancelled = FALSE
        )
        "#,
    )
    .bind(new.restaurant_id)
    .bind(&new.guest_email)
    .bind(new.date)
    .bind(new.slot_time)
    .fetch_one(&mut *tx)
    .await?;

    if duplicate {
        return Ok(InsertOutcome::GuestDuplicate);
    }

    if let Some(table_id) = new.table_id {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE restaurant_id = $1 AND table_id = $2
                  AND date = $3 AND slot_time = $4 AND cancelled = FALSE
            )
            "#,
        )
        .bind(new.restaurant_id)
        .bind(table_id)
        .bind(new.date)
        .bind(new.slot_time)
        .fetch_one(&mut *tx)
        .await?;

        if taken {
            return Ok(InsertOutcome::TableTaken);
        }
    }

    let inserted = sqlx::query_as::<_, DbReservation>(
        r#"
        INSERT INTO reservations
            (id, restaurant_id, table_id, guest_name, guest_email, party_size,
             date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, FALSE, FALSE, $9, $10, $11)
        RETURNING id, restaurant_id, table_id, guest_name, guest_email, party_size,
                  date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        "#,
    )
    .bind(id)
    .bind(new.restaurant_id)
    .bind(new.table_id)
    .bind(&new.guest_name)
    .bind(&new.guest_email)
    .bind(new.party_size)
    .bind(new.date)
    .bind(new.slot_time)
    .bind(new.deposit_cents)
    .bind(new.payment_ref.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let reservation = match inserted {
        Ok(reservation) => reservation,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uniq_table_booking") => {
            return Ok(InsertOutcome::TableTaken);
        }
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uniq_guest_booking") => {
            return Ok(InsertOutcome::GuestDuplicate);
        }
        Err(e) => return Err(e.into()),
    };

    tx.commit().await?;

    Ok(InsertOutcome::Inserted(reservation))
}

/// Changes an owner can apply to a reservation. `None` keeps the current
/// value; a table move passes `table_id`.
#[derive(Default)]
pub struct ReservationChanges {
    pub table_id: Option<Uuid>,
    pub seen: Option<bool>,
    pub attended: Option<bool>,
    pub cancelled: Option<bool>,
}

pub async fn update_reservation(
    pool: &Pool<Postgres>,
    id: Uuid,
    changes: ReservationChanges,
) -> Result<Option<DbReservation>> {
    let Some(current) = get_reservation_by_id(pool, id).await? else {
        return Ok(None);
    };

    let updated = sqlx::query_as::<_, DbReservation>(
        r#"
        UPDATE reservations
        SET table_id = $2, seen = $3, attended = $4, cancelled = $5
        WHERE id = $1
        RETURNING id, restaurant_id, table_id, guest_name, guest_email, party_size,
                  date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        "#,
    )
    .bind(id)
    .bind(changes.table_id.or(current.table_id))
    .bind(changes.seen.unwrap_or(current.seen))
    .bind(changes.attended.unwrap_or(current.attended))
    .bind(changes.cancelled.unwrap_or(current.cancelled))
    .fetch_one(pool)
    .await?;

    Ok(Some(updated))
}

/// Marks a reservation cancelled. Safe to call twice; the second call is a
/// no-op that still returns the row.
pub async fn cancel_reservation(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbReservation>> {
    let reservation = sqlx::query_as::<_, DbReservation>(
        r#"
        UPDATE reservations
        SET cancelled = TRUE
        WHERE id = $1
        RETURNING id, restaurant_id, table_id, guest_name, guest_email, party_size,
                  date, slot_time, cancelled, attended, seen, deposit_cents, payment_ref, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(reservation)
}
