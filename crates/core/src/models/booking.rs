use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::table::TableWithType;

/// One day in the diner-facing calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableSlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<NaiveTime>,
}

/// Tables that can seat the party at the requested slot.
///
/// `fallback` marks restaurants with no configured tables; `exact_match` is
/// the "a table of exactly this size exists" hint the booking screen shows.
/// It never changes which tables are listed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableTablesResponse {
    pub tables: Vec<TableWithType>,
    pub fallback: bool,
    pub exact_match: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositQuoteResponse {
    pub deposit_cents: i64,
    pub currency: String,
}
