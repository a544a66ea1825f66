use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use tably_core::models::closure::Closure;
use tably_core::models::pricing::PricingTier;
use tably_core::models::reservation::Reservation;
use tably_core::models::restaurant::{Coordinates, Restaurant};
use tably_core::models::table::{DiningTable, TableType, TableWithType};

// Row structs mirror the schema one to one; `into_model` is the single
// parse/validate boundary turning stored strings and column pairs into the
// typed core shapes.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbRestaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: String,
    pub currency: String,
    pub password_hash: Option<String>,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_minutes: i32,
    pub slot_mode: String,
    pub assignment_mode: String,
    pub created_at: DateTime<Utc>,
}

impl DbRestaurant {
    pub fn into_model(self) -> Result<Restaurant> {
        let location = match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng).map_err(|e| eyre!(e))?),
            _ => None,
        };
        Ok(Restaurant {
            id: self.id,
            name: self.name,
            address: self.address,
            location,
            timezone: self.timezone,
            currency: self.currency,
            password_hash: self.password_hash,
            flat_deposit_cents: self.flat_deposit_cents,
            open_time: self.open_time,
            close_time: self.close_time,
            slot_minutes: self.slot_minutes,
            slot_mode: self.slot_mode.parse().map_err(|e: String| eyre!(e))?,
            assignment_mode: self.assignment_mode.parse().map_err(|e: String| eyre!(e))?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub slot_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTableType {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl DbTableType {
    pub fn into_model(self) -> TableType {
        TableType {
            id: self.id,
            restaurant_id: self.restaurant_id,
            name: self.name,
            capacity: self.capacity,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTable {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_type_id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl DbTable {
    pub fn into_model(self) -> Result<DiningTable> {
        Ok(DiningTable {
            id: self.id,
            restaurant_id: self.restaurant_id,
            table_type_id: self.table_type_id,
            name: self.name,
            status: self.status.parse().map_err(|e: String| eyre!(e))?,
            created_at: self.created_at,
        })
    }
}

/// A table joined with its type, as one flat row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTableWithType {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub table_type_id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub type_name: String,
    pub capacity: i32,
    pub type_created_at: DateTime<Utc>,
}

impl DbTableWithType {
    pub fn into_model(self) -> Result<TableWithType> {
        Ok(TableWithType {
            table: DiningTable {
                id: self.id,
                restaurant_id: self.restaurant_id,
                table_type_id: self.table_type_id,
                name: self.name,
                status: self.status.parse().map_err(|e: String| eyre!(e))?,
                created_at: self.created_at,
            },
            table_type: TableType {
                id: self.table_type_id,
                restaurant_id: self.restaurant_id,
                name: self.type_name,
                capacity: self.capacity,
                created_at: self.type_created_at,
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPricingTier {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub min_people: i32,
    pub max_people: i32,
    pub cost_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl DbPricingTier {
    pub fn into_model(self) -> PricingTier {
        PricingTier {
            id: self.id,
            restaurant_id: self.restaurant_id,
            min_people: self.min_people,
            max_people: self.max_people,
            cost_cents: self.cost_cents,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbClosure {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i16>,
    pub is_all_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl DbClosure {
    pub fn into_model(self) -> Closure {
        Closure {
            id: self.id,
            restaurant_id: self.restaurant_id,
            date: self.date,
            day_of_week: self.day_of_week,
            is_all_day: self.is_all_day,
            start_time: self.start_time,
            end_time: self.end_time,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReservation {
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
    pub payment_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbReservation {
    pub fn into_model(self) -> Reservation {
        Reservation {
            id: self.id,
            restaurant_id: self.restaurant_id,
            table_id: self.table_id,
            guest_name: self.guest_name,
            guest_email: self.guest_email,
            party_size: self.party_size,
            date: self.date,
            slot_time: self.slot_time,
            cancelled: self.cancelled,
            attended: self.attended,
            seen: self.seen,
            deposit_cents: self.deposit_cents,
            payment_ref: self.payment_ref,
            created_at: self.created_at,
        }
    }
}
