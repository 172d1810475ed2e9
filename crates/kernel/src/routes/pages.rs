//! Informational pages.

use axum::{Router, extract::State, response::Response, routing::get};
use tower_sessions::Session;

use crate::error::AppResult;
use crate::state::AppState;

use super::helpers::render_page;

/// Create the informational pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/login", get(login))
}

async fn home(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    render_page(&state, &session, "pages/index.html", "Home", tera::Context::new()).await
}

async fn about(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    render_page(&state, &session, "pages/about.html", "About", tera::Context::new()).await
}

async fn contact(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    render_page(&state, &session, "pages/contact.html", "Contact", tera::Context::new()).await
}

async fn login(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    render_page(&state, &session, "pages/login.html", "Login", tera::Context::new()).await
}
