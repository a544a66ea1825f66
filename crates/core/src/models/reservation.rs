use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    /// None when the restaurant operates without configured tables.
    pub table_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
    pub cancelled: bool,
    pub attended: bool,
    pub seen: bool,
    pub deposit_cents: i64,
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationResponse {
    pub id: Uuid,
    pub table_id: Option<Uuid>,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
    pub party_size: i32,
    pub deposit_cents: i64,
    pub payment_ref: Option<String>,
}

/// Owner-side edits: visibility flags, attendance, cancellation, table move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReservationRequest {
    pub seen: Option<bool>,
    pub attended: Option<bool>,
    pub cancelled: Option<bool>,
    pub table_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub party_size: i32,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
    pub cancelled: bool,
    pub attended: bool,
    pub seen: bool,
    pub deposit_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            restaurant_id: r.restaurant_id,
            table_id: r.table_id,
            guest_name: r.guest_name,
            guest_email: r.guest_email,
            party_size: r.party_size,
            date: r.date,
            slot_time: r.slot_time,
            cancelled: r.cancelled,
            attended: r.attended,
            seen: r.seen,
            deposit_cents: r.deposit_cents,
            created_at: r.created_at,
        }
    }
}
