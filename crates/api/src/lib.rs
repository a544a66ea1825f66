//! # Tably API
//!
//! The API crate provides the web server implementation for the Tably
//! reservation service. It defines RESTful endpoints for managing
//! restaurants, tables, pricing, closures, and reservations.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Provide cross-cutting concerns like authentication and error handling
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.
//! Handlers fetch rows, run the pure resolvers from the core crate over
//! them, and write the outcome back; no booking rule lives in this crate.

/// Restaurant-local wall clock
pub mod clock;
/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Default payment and notification collaborators
pub mod integrations;
/// Middleware for authentication, logging, and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use sqlx::PgPool;
use tably_core::integrations::{Notifier, PaymentGateway};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// This struct encapsulates dependencies that are shared across the application:
/// the database pool and the external collaborators the booking pipeline
/// talks to. Handlers never construct collaborators themselves, so tests can
/// swap in doubles here.
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Deposit collection provider
    pub payments: Arc<dyn PaymentGateway>,
    /// Confirmation and cancellation messaging
    pub notifier: Arc<dyn Notifier>,
}

/// Builds the application router over the given state.
///
/// Split out of [`start_server`] so tests can drive the exact production
/// routing without binding a socket.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Restaurant management endpoints
        .merge(routes::restaurant::routes())
        // Table type and table management endpoints
        .merge(routes::tables::routes())
        // Deposit pricing tier endpoints
        .merge(routes::pricing::routes())
        // Closure management endpoints
        .merge(routes::closures::routes())
        // Diner-facing discovery endpoints
        .merge(routes::availability::routes())
        // Reservation booking and management endpoints
        .merge(routes::reservations::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes the application, sets up logging, configures routes,
/// and starts the HTTP server. Payment and notification collaborators default
/// to the tracing-backed implementations in [`integrations`].
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool for database operations
///
/// # Returns
///
/// * `Result<()>` - Success or error result
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState {
        db_pool,
        payments: Arc::new(integrations::LogPaymentGateway),
        notifier: Arc::new(integrations::LogNotifier),
    });

    // Build the application router with all routes
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(
                origins
                    .iter()
                    .filter_map(|origin| {
                        origin
                            .parse()
                            .map_err(|_| tracing::warn!("Ignoring bad CORS origin: {}", origin))
                            .ok()
                    })
                    .collect::<Vec<_>>(),
            )
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(tower_http::timeout::TimeoutLayer::new(
        std::time::Duration::from_secs(config.request_timeout),
    ));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
