//! Closure resolution for dates and times.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::models::closure::Closure;

fn matches_date(closure: &Closure, date: NaiveDate) -> bool {
    if let Some(closed_on) = closure.date {
        return closed_on == date;
    }
    if let Some(day) = closure.day_of_week {
        return i32::from(day) == date.weekday().num_days_from_monday() as i32;
    }
    false
}

fn covers_time(closure: &Closure, time: NaiveTime) -> bool {
    if closure.is_all_day {
        return true;
    }
    match (closure.start_time, closure.end_time) {
        (Some(start), Some(end)) => start <= time && time < end,
        // a partial closure missing its window is treated as all-day
        _ => true,
    }
}

/// Date-level check used for calendar filtering.
///
/// A partial-day closure still marks the whole date closed here; callers
/// needing the finer answer use [`is_closed_at`].
pub fn is_closed(closures: &[Closure], date: NaiveDate) -> bool {
    closures.iter().any(|c| matches_date(c, date))
}

/// Time-level check honoring partial-day closures.
pub fn is_closed_at(closures: &[Closure], date: NaiveDate, time: NaiveTime) -> bool {
    closures
        .iter()
        .any(|c| matches_date(c, date) && covers_time(c, time))
}
