//! HTTP layer - JSON routes over the ticket operations plus the client bundle.
//!
//! All `/api` routes share an [`AppState`] holding the database connection.
//! Any path that is not an API route is served from the static directory, and
//! unknown paths fall back to its `index.html` so client-side routing works.

/// Error-to-response mapping
pub mod error;
/// Route handlers
pub mod handlers;

use axum::{
    Router,
    routing::{get, patch, put},
};
use sea_orm::DatabaseConnection;
use std::{path::Path, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Shared data available to all handlers.
/// Holds the store handle; each request borrows it for the duration of its
/// own operation.
pub struct AppState {
    /// Database connection pool for all ticket operations
    pub database: DatabaseConnection,
}

impl AppState {
    /// Creates a new `AppState` around the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Builds the application router.
///
/// `static_dir` is the built client bundle; it does not need to exist for the
/// API routes to work.
pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let client = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route(
            "/api/tickets",
            get(handlers::list_tickets).post(handlers::create_ticket),
        )
        .route(
            "/api/tickets/:id",
            put(handlers::update_ticket).delete(handlers::delete_ticket),
        )
        .route(
            "/api/tickets/:id/estado",
            patch(handlers::update_ticket_estado),
        )
        .route("/api/estadisticas", get(handlers::ticket_stats))
        .fallback_service(client)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
