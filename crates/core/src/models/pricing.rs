use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A party-size range mapped to a deposit cost.
///
/// When any tier exists for a restaurant the flat deposit is ignored
/// entirely, including for party sizes no tier covers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub min_people: i32,
    pub max_people: i32,
    pub cost_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePricingTierRequest {
    pub min_people: i32,
    pub max_people: i32,
    pub cost_cents: i64,
}
