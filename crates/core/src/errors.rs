use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Restaurant is closed on {0}")]
    RestaurantClosed(NaiveDate),

    #[error("Table is no longer available for {date} at {time}")]
    TableNoLongerAvailable { date: NaiveDate, time: NaiveTime },

    #[error("A reservation for this guest already exists for {date} at {time}")]
    DuplicateBooking { date: NaiveDate, time: NaiveTime },

    #[error("Pricing tier {new_min}-{new_max} overlaps existing tier {existing_min}-{existing_max}")]
    OverlappingTier {
        new_min: i32,
        new_max: i32,
        existing_min: i32,
        existing_max: i32,
    },

    #[error("Payment failed: {0}")]
    PaymentFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type BookingResult<T> = Result<T, BookingError>;
