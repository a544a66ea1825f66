//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the Tably API.
//! It maps domain-specific errors to appropriate HTTP status codes and JSON
//! error responses, ensuring a consistent error handling experience across
//! the entire API.
//!
//! The implementation is based on Axum's error handling mechanisms and
//! integrates with Tably's custom error types. Conflict-shaped outcomes
//! coming from the booking guard (closed restaurant, taken table, duplicate
//! guest, overlapping tier) all map to `409 Conflict`; transient database
//! failures map to `503 Service Unavailable` so clients know a retry can
//! succeed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tably_core::errors::BookingError;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps domain-specific `BookingError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate
/// status codes and JSON payloads.
///
/// # Example
///
/// ```ignore
/// async fn handler(id: Uuid) -> Result<Json<ReservationResponse>, AppError> {
///     let reservation = repository.get_reservation(id)
///         .await
///         .map_err(|e| AppError(BookingError::NotFound(e.to_string())))?;
///
///     Ok(Json(reservation))
/// }
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// Converts application errors to HTTP responses
///
/// This implementation maps each error type to the appropriate HTTP status code
/// and formats the error message into a JSON response body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::Authentication(_) => StatusCode::UNAUTHORIZED,
            BookingError::RestaurantClosed(_) => StatusCode::CONFLICT,
            BookingError::TableNoLongerAvailable { .. } => StatusCode::CONFLICT,
            BookingError::DuplicateBooking { .. } => StatusCode::CONFLICT,
            BookingError::OverlappingTier { .. } => StatusCode::CONFLICT,
            BookingError::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
            BookingError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Get the error message and format as JSON
        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        // Combine status code and JSON body into a response
        (status, body).into_response()
    }
}

/// Automatic conversion from BookingError to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, BookingError>` in handler functions that return `Result<T, AppError>`.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError
///
/// This implementation allows using `?` operator with functions that return
/// `Result<T, eyre::Report>` in handler functions that return `Result<T, AppError>`.
/// It wraps the eyre error in a BookingError::Database variant.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Maps a BookingError to an HTTP response
///
/// This function is provided for code that builds responses outside the
/// `Result<_, AppError>` return path.
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
