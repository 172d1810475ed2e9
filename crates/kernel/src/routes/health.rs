//! Health check endpoint.
//!
//! Returns 200 OK when every record store answers, 503 otherwise.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    birds: bool,
    products: bool,
    admins: bool,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (birds, products, admins) = tokio::join!(
        state.birds().ping(),
        state.products().ping(),
        state.admins().ping()
    );
    let (birds, products, admins) = (birds.is_ok(), products.is_ok(), admins.is_ok());
    let healthy = birds && products && admins;

    if !healthy {
        tracing::warn!(birds, products, admins, "health check failed");
    }

    let (status_code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status,
            birds,
            products,
            admins,
        }),
    )
}

/// Create the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
