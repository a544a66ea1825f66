//! Restaurant-local wall clock.
//!
//! "Is this slot in the past" is answered in the restaurant's own timezone,
//! not the server's. The stored IANA zone name is resolved here; an
//! unparseable zone falls back to UTC rather than failing the request.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Current wall-clock date and time in the given IANA timezone.
pub fn local_now(timezone: &str) -> NaiveDateTime {
    match timezone.parse::<Tz>() {
        Ok(tz) => Utc::now().with_timezone(&tz).naive_local(),
        Err(_) => {
            tracing::warn!("Unknown timezone {}, falling back to UTC", timezone);
            Utc::now().naive_utc()
        }
    }
}
