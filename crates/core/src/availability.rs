//! Table availability resolution.
//!
//! Answers "which tables can seat this party at this slot" from rows the
//! caller has already fetched: the restaurant's tables joined with their
//! types, and the non-cancelled reservations for the requested date and
//! time. Being pure over those inputs, the same call at commit time is the
//! recheck the booking guard relies on.

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::reservation::Reservation;
use crate::models::table::{TableStatus, TableWithType};

/// Result of an availability pass.
#[derive(Debug, Clone)]
pub enum Availability {
    /// The restaurant has no active tables configured; every slot seats any
    /// party and bookings record no table.
    Fallback,
    /// Tables that seat the party and are free at the slot, smallest first.
    Tables(Vec<TableWithType>),
}

impl Availability {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Availability::Fallback)
    }

    /// Whether the slot can be booked at all.
    pub fn is_bookable(&self) -> bool {
        match self {
            Availability::Fallback => true,
            Availability::Tables(tables) => !tables.is_empty(),
        }
    }

    /// Whether some listed table seats the party exactly.
    pub fn has_exact_match(&self, party_size: i32) -> bool {
        match self {
            Availability::Fallback => false,
            Availability::Tables(tables) => tables
                .iter()
                .any(|t| t.table_type.capacity == party_size),
        }
    }

    /// Whether a specific table survived the availability pass.
    pub fn contains_table(&self, table_id: Uuid) -> bool {
        match self {
            Availability::Fallback => false,
            Availability::Tables(tables) => {
                tables.iter().any(|t| t.table.id == table_id)
            }
        }
    }

    pub fn into_tables(self) -> Vec<TableWithType> {
        match self {
            Availability::Fallback => Vec::new(),
            Availability::Tables(tables) => tables,
        }
    }
}

/// Resolves the tables available for `party_size` at one (date, time) slot.
///
/// `reservations` must be the non-cancelled reservations of the same
/// restaurant for that exact date and time; cancelled rows are tolerated and
/// ignored. `exclude_reservation` names a reservation being edited so a
/// table move does not conflict with the booking it is moving.
pub fn available_tables(
    tables: &[TableWithType],
    reservations: &[Reservation],
    party_size: i32,
    exclude_reservation: Option<Uuid>,
) -> Availability {
    let active: Vec<&TableWithType> = tables
        .iter()
        .filter(|t| t.table.status == TableStatus::Active)
        .collect();

    if active.is_empty() {
        return Availability::Fallback;
    }

    let conflicts: HashSet<Uuid> = reservations
        .iter()
        .filter(|r| !r.cancelled)
        .filter(|r| exclude_reservation != Some(r.id))
        .filter_map(|r| r.table_id)
        .collect();

    let mut free: Vec<TableWithType> = active
        .into_iter()
        .filter(|t| t.table_type.capacity >= party_size)
        .filter(|t| !conflicts.contains(&t.table.id))
        .cloned()
        .collect();

    // Smallest adequate table first; name breaks capacity ties. Automatic
    // assignment takes the head of this ordering.
    free.sort_by(|a, b| {
        a.table_type
            .capacity
            .cmp(&b.table_type.capacity)
            .then_with(|| a.table.name.cmp(&b.table.name))
    });

    Availability::Tables(free)
}
