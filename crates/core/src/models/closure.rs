use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rule removing a date or weekday (fully or partially) from bookability.
///
/// Exactly one of `date` and `day_of_week` is set. `day_of_week` counts from
/// Monday = 0 to Sunday = 6. When `is_all_day` is false the closure covers
/// `[start_time, end_time)` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Closure {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i16>,
    pub is_all_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

fn default_all_day() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClosureRequest {
    pub date: Option<NaiveDate>,
    pub day_of_week: Option<i16>,
    #[serde(default = "default_all_day")]
    pub is_all_day: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}
