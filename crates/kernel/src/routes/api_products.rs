//! Products API.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tower_sessions::Session;
use tracing::info;

use crate::auth::ApiAdmin;
use crate::error::{AppError, AppResult};
use crate::flash::Level;
use crate::models::{Product, ProductInput};
use crate::state::AppState;

use super::helpers::{flash_all_redirect, flash_redirect, parse_id};

pub const ADDED: &str = "Product was Added Successfully";
pub const UPDATED: &str = "Product was Updated Successfully";

/// Create the products API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).post(update_product).delete(delete_product),
        )
}

async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(state.products().find_all().await?))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products()
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product))
}

async fn create_product(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    Form(input): Form<ProductInput>,
) -> AppResult<Response> {
    let fields = match input.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(flash_all_redirect(
                &session,
                Level::Danger,
                errors.into_messages(),
                "/admin-panel",
            )
            .await);
        }
    };

    let product = Product::new(fields);
    state.products().save(&product).await?;
    info!(product_id = %product.id, name = %product.name, by = %caller.username, "product created");

    Ok(flash_redirect(&session, Level::Success, ADDED, "/admin-panel").await)
}

async fn update_product(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    Path(id): Path<String>,
    Form(input): Form<ProductInput>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;

    let fields = match input.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            let back = format!("/products/{id}/edit");
            return Ok(
                flash_all_redirect(&session, Level::Danger, errors.into_messages(), &back).await,
            );
        }
    };

    let mut product = state
        .products()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    product.apply(fields);
    state.products().save(&product).await?;
    info!(product_id = %product.id, by = %caller.username, "product updated");

    Ok(flash_redirect(&session, Level::Success, UPDATED, "/admin-panel").await)
}

async fn delete_product(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let deleted = match parse_id(&id) {
        Ok(id) => state.products().delete(id).await?,
        Err(_) => false,
    };

    if deleted {
        info!(product_id = %id, by = %caller.username, "product deleted");
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response())
    }
}
