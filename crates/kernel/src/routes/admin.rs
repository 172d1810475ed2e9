//! Session-guarded admin pages.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use tower_sessions::Session;

use crate::error::{AppError, AppResult};
use crate::models::Admin;
use crate::state::AppState;

use super::catalog::{bird_context, find_bird, find_product, product_context};
use super::helpers::{parse_id, render_page, require_admin};

/// Create the admin pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin-panel", get(admin_panel))
        .route("/admins", get(list_admins))
        .route("/admins/{id}", get(view_admin))
        .route("/admins/{id}/edit", get(edit_admin))
        .route("/birds/{id}/edit", get(edit_bird))
        .route("/products/{id}/edit", get(edit_product))
}

/// Upload widget settings exposed to templates.
fn upload_context(state: &AppState, context: &mut tera::Context) {
    let policy = state.upload_policy();
    context.insert("max_images", &policy.max_images);
    context.insert("allowed_types", &policy.allowed_mime_types.join(","));
}

async fn admin_panel(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, &session).await {
        return Ok(redirect);
    }

    let mut context = tera::Context::new();
    context.insert("admins", &state.admins().find_all().await?);
    upload_context(&state, &mut context);
    render_page(&state, &session, "pages/admin-panel.html", "Admins", context).await
}

async fn list_admins(State(state): State<AppState>, session: Session) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, &session).await {
        return Ok(redirect);
    }

    let mut context = tera::Context::new();
    context.insert("admins", &state.admins().find_all().await?);
    render_page(&state, &session, "pages/admins.html", "Admins", context).await
}

async fn view_admin(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    admin_page(state, session, &id, false).await
}

async fn edit_admin(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    admin_page(state, session, &id, true).await
}

async fn admin_page(
    state: AppState,
    session: Session,
    id: &str,
    is_editing: bool,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, &session).await {
        return Ok(redirect);
    }

    let admin: Admin = state
        .admins()
        .find_by_id(parse_id(id)?)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut context = tera::Context::new();
    context.insert("admin", &admin);
    context.insert("is_editing", &is_editing);
    render_page(&state, &session, "object-info/admin.html", &admin.username, context).await
}

async fn edit_bird(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, &session).await {
        return Ok(redirect);
    }

    let bird = find_bird(&state, &id).await?;
    let mut context = bird_context(&bird, true);
    upload_context(&state, &mut context);
    let title = bird.title().to_string();
    render_page(&state, &session, "object-info/bird.html", &title, context).await
}

async fn edit_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, &session).await {
        return Ok(redirect);
    }

    let product = find_product(&state, &id).await?;
    let title = product.name.clone();
    render_page(
        &state,
        &session,
        "object-info/product.html",
        &title,
        product_context(&product, true),
    )
    .await
}
