//! Copsewood Aviaries web application.
//!
//! Catalog pages for birds and products, an admin panel, and a small JSON
//! API. Listing pages are driven by the `copsewood-catalog` pipeline.

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod theme;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::{AppState, StateParts, Stores};

/// Assemble the application router.
///
/// Generic over the session store so tests can run without Redis.
pub fn build_router<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .merge(routes::pages::router())
        .merge(routes::catalog::router())
        .merge(routes::admin::router())
        .merge(routes::contact::router())
        .merge(routes::api_birds::router())
        .merge(routes::api_products::router())
        .merge(routes::api_admins::router())
        .merge(routes::health::router())
        .merge(routes::static_files::router())
        .fallback(|| async { AppError::NotFound })
        // Middleware layers (last added = first executed in request flow):
        // TraceLayer -> compression -> trailing slash -> session -> routes
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::redirect_trailing_slash,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
