use chrono::{DateTime, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Normalized geographic coordinates.
///
/// Historic clients sent locations as `{lat, lng}`, `{latitude, longitude}`,
/// or a JSON string wrapping either shape. All three are accepted here, at
/// the single parse boundary; everything past deserialization works with one
/// shape only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCoordinates {
    Long { latitude: f64, longitude: f64 },
    Short { lat: f64, lng: f64 },
    Text(String),
}

impl RawCoordinates {
    fn flatten(self) -> Result<(f64, f64), String> {
        match self {
            RawCoordinates::Long { latitude, longitude } => Ok((latitude, longitude)),
            RawCoordinates::Short { lat, lng } => Ok((lat, lng)),
            RawCoordinates::Text(text) => {
                let nested: RawCoordinates = serde_json::from_str(&text)
                    .map_err(|e| format!("invalid coordinate string: {}", e))?;
                match nested {
                    RawCoordinates::Text(_) => {
                        Err("coordinate strings must not nest further strings".to_string())
                    }
                    other => other.flatten(),
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for Coordinates {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawCoordinates::deserialize(deserializer)?;
        let (latitude, longitude) = raw.flatten().map_err(de::Error::custom)?;
        Coordinates::new(latitude, longitude).map_err(de::Error::custom)
    }
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {} out of range", latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {} out of range", longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// How a restaurant's candidate booking slots are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotMode {
    /// The owner maintains an explicit list of slot times.
    Fixed,
    /// Slots are generated from the open/close window and slot duration.
    Window,
}

impl SlotMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotMode::Fixed => "fixed",
            SlotMode::Window => "window",
        }
    }
}

impl std::str::FromStr for SlotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(SlotMode::Fixed),
            "window" => Ok(SlotMode::Window),
            other => Err(format!("unknown slot mode: {}", other)),
        }
    }
}

/// Whether the kitchen assigns tables or the guest picks one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentMode {
    Automatic,
    Manual,
}

impl AssignmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentMode::Automatic => "automatic",
            AssignmentMode::Manual => "manual",
        }
    }
}

impl std::str::FromStr for AssignmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "automatic" => Ok(AssignmentMode::Automatic),
            "manual" => Ok(AssignmentMode::Manual),
            other => Err(format!("unknown assignment mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    pub timezone: String,
    pub currency: String,
    pub password_hash: Option<String>,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_minutes: i32,
    pub slot_mode: SlotMode,
    pub assignment_mode: AssignmentMode,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    pub password: Option<String>,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
    pub slot_mode: Option<SlotMode>,
    pub assignment_mode: Option<AssignmentMode>,
    /// Fixed candidate slot times, used when `slot_mode` is `fixed`.
    #[serde(default)]
    pub slots: Vec<NaiveTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRestaurantResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub has_password: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRestaurantResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    pub timezone: String,
    pub currency: String,
    pub flat_deposit_cents: Option<i64>,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub slot_minutes: i32,
    pub slot_mode: SlotMode,
    pub assignment_mode: AssignmentMode,
    pub slots: Vec<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRestaurantRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub location: Option<Coordinates>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
    /// A zero value clears the deposit; absent leaves it unchanged.
    pub flat_deposit_cents: Option<i64>,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub slot_minutes: Option<i32>,
    pub slot_mode: Option<SlotMode>,
    pub assignment_mode: Option<AssignmentMode>,
    /// Replaces the fixed slot list wholesale when present.
    pub slots: Option<Vec<NaiveTime>>,
    /// Owner password, required when the restaurant is protected.
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRestaurantResponse {
    pub id: Uuid,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPasswordResponse {
    pub valid: bool,
}
