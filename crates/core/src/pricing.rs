//! Deposit pricing resolution.

use crate::errors::{BookingError, BookingResult};
use crate::models::pricing::PricingTier;

/// Resolves the deposit for a party, in minor currency units.
///
/// Any tier present overrides the flat deposit completely: a size no tier
/// covers costs nothing, even when a flat deposit is configured.
pub fn deposit_for(
    flat_deposit_cents: Option<i64>,
    tiers: &[PricingTier],
    party_size: i32,
) -> i64 {
    if tiers.is_empty() {
        return flat_deposit_cents.unwrap_or(0).max(0);
    }
    tiers
        .iter()
        .find(|t| t.min_people <= party_size && party_size <= t.max_people)
        .map(|t| t.cost_cents)
        .unwrap_or(0)
}

/// Validates a new tier range against a restaurant's existing tiers.
///
/// Two ranges may share one endpoint: `[3,5]` collides with `[4,6]` while
/// `[6,8]` sits cleanly after it. A size landing on a shared endpoint
/// resolves to the earlier tier in `min_people` order.
pub fn check_tier_overlap(
    existing: &[PricingTier],
    min_people: i32,
    max_people: i32,
) -> BookingResult<()> {
    if min_people < 1 {
        return Err(BookingError::Validation(
            "min_people must be at least 1".to_string(),
        ));
    }
    if min_people > max_people {
        return Err(BookingError::Validation(format!(
            "min_people {} exceeds max_people {}",
            min_people, max_people
        )));
    }
    if let Some(hit) = existing
        .iter()
        .find(|t| t.min_people < max_people && min_people < t.max_people)
    {
        return Err(BookingError::OverlappingTier {
            new_min: min_people,
            new_max: max_people,
            existing_min: hit.min_people,
            existing_max: hit.max_people,
        });
    }
    Ok(())
}
