//! Candidate slot enumeration and the bookable-slot filter.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::availability::available_tables;
use crate::models::reservation::Reservation;
use crate::models::restaurant::{Restaurant, SlotMode};
use crate::models::table::TableWithType;

/// Enumerates the candidate slot times for a restaurant, chronologically.
///
/// Fixed mode returns the owner-maintained list; window mode steps from
/// `open_time` in `slot_minutes` increments, keeping starts whose whole slot
/// fits before `close_time`.
pub fn candidate_slots(restaurant: &Restaurant, fixed: &[NaiveTime]) -> Vec<NaiveTime> {
    match restaurant.slot_mode {
        SlotMode::Fixed => {
            let mut slots = fixed.to_vec();
            slots.sort();
            slots.dedup();
            slots
        }
        SlotMode::Window => {
            let mut slots = Vec::new();
            if restaurant.slot_minutes < 1 {
                return slots;
            }
            let step = Duration::minutes(i64::from(restaurant.slot_minutes));
            let mut cursor = restaurant.open_time;
            loop {
                let (end, wrapped) = cursor.overflowing_add_signed(step);
                // a slot crossing midnight never fits the same-day window
                if wrapped != 0 || end > restaurant.close_time {
                    break;
                }
                slots.push(cursor);
                cursor = end;
            }
            slots
        }
    }
}

/// Keeps the candidate slots a diner can actually book, preserving order.
///
/// A slot is dropped when it is already past (checked only when `date` is
/// `today`; `now` is the restaurant-local wall clock) or when, outside
/// fallback mode, no table can seat the party at it. `day_reservations`
/// holds the restaurant's non-cancelled reservations for the whole `date`.
pub fn bookable_slots(
    candidates: &[NaiveTime],
    date: NaiveDate,
    now: NaiveDateTime,
    tables: &[TableWithType],
    day_reservations: &[Reservation],
    party_size: i32,
) -> Vec<NaiveTime> {
    candidates
        .iter()
        .copied()
        .filter(|slot| !(date == now.date() && *slot < now.time()))
        .filter(|slot| {
            let at_slot: Vec<Reservation> = day_reservations
                .iter()
                .filter(|r| r.slot_time == *slot)
                .cloned()
                .collect();
            available_tables(tables, &at_slot, party_size, None).is_bookable()
        })
        .collect()
}
