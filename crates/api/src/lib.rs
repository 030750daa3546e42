//! # Seatplan API
//!
//! The API crate provides the web server for the Seatplan reservation service.
//! It exposes table availability, booking, table assignment and the
//! reservation status lifecycle as JSON endpoints.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into reservation book operations
//! - **Middleware**: Error mapping shared by every handler
//! - **State**: The reservation book plus the optional persistence store
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework; persistence goes through the
//! `BookingStore` trait from `seatplan-db`.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Shared state and startup loading
pub mod state;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

pub use state::ApiState;

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Table catalog endpoints
        .merge(routes::table::routes())
        // Availability endpoints
        .merge(routes::availability::routes())
        // Reservation management endpoints
        .merge(routes::reservation::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Installs the global tracing subscriber at the configured level.
pub fn init_tracing(config: &config::ApiConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and state
///
/// This function configures routes and middleware, and serves until the
/// process is stopped.
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    let app = app(Arc::new(state));

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
            .allow_origin(origins.clone())
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            )),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
