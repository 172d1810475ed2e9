//! Public bird and product pages.
//!
//! The listing pages run the stored records through the catalog pipeline
//! using the `categories`, `price`, `sortby` and `page` query parameters.

use std::collections::BTreeSet;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use copsewood_catalog::{CatalogRecord, ListingParams, QuerySpec, SortDirection, SortKey, run};
use serde::Serialize;
use tower_sessions::Session;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Bird, Product};
use crate::state::AppState;

use super::helpers::{parse_id, render_page};

/// Create the catalog pages router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/birds", get(list_birds))
        .route("/birds/{id}", get(view_bird))
        .route("/products", get(list_products))
        .route("/products/{id}", get(view_product))
}

/// Run the pipeline and build the shared listing context.
///
/// Inserts `listing` (the page), `categories` (every category present in the
/// unfiltered records, for the filter form), `selected`, `params`,
/// `sort_options` and `base` (the listing path, for pager links).
pub fn listing_context<R>(
    records: &[R],
    params: &ListingParams,
    base: &str,
) -> AppResult<tera::Context>
where
    R: CatalogRecord + Serialize,
{
    let spec = QuerySpec::from_params::<R>(params)?;
    let page = run(records, &spec);

    debug!(
        total = page.total_count,
        page = page.page,
        pages = page.page_count,
        "listing rendered"
    );

    let categories: BTreeSet<&str> = records.iter().filter_map(CatalogRecord::category).collect();

    let mut context = tera::Context::new();
    context.insert("listing", &page);
    context.insert("is_empty", &page.is_empty());
    context.insert("categories", &categories);
    context.insert("selected", &spec.categories.unwrap_or_default());
    context.insert("params", params);
    context.insert("sort_options", &sort_options::<R>());
    context.insert("base", base);
    Ok(context)
}

/// `(sortby value, label)` pairs for every key `R` supports.
fn sort_options<R: CatalogRecord>() -> Vec<(String, String)> {
    R::SORT_KEYS
        .iter()
        .flat_map(|key| {
            [SortDirection::Asc, SortDirection::Desc].map(|direction| {
                let label = match (key, direction) {
                    (SortKey::Price, SortDirection::Asc) => "Price: Low to High".to_string(),
                    (SortKey::Price, SortDirection::Desc) => "Price: High to Low".to_string(),
                    (_, SortDirection::Asc) => format!("{}: A to Z", capitalize(key.as_str())),
                    (_, SortDirection::Desc) => format!("{}: Z to A", capitalize(key.as_str())),
                };
                (format!("{key} {}", direction.as_str()), label)
            })
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

async fn list_birds(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListingParams>,
) -> AppResult<Response> {
    let birds = state.birds().find_all().await?;
    let context = listing_context(&birds, &params, "/birds")?;
    render_page(&state, &session, "pages/birds.html", "Birds", context).await
}

async fn list_products(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListingParams>,
) -> AppResult<Response> {
    let products = state.products().find_all().await?;
    let context = listing_context(&products, &params, "/products")?;
    render_page(&state, &session, "pages/products.html", "Products", context).await
}

async fn view_bird(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let bird = find_bird(&state, &id).await?;
    let title = bird.title().to_string();
    render_page(&state, &session, "object-info/bird.html", &title, bird_context(&bird, false)).await
}

async fn view_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let product = find_product(&state, &id).await?;
    let title = product.name.clone();
    render_page(
        &state,
        &session,
        "object-info/product.html",
        &title,
        product_context(&product, false),
    )
    .await
}

pub(crate) async fn find_bird(state: &AppState, id: &str) -> AppResult<Bird> {
    state
        .birds()
        .find_by_id(parse_id(id)?)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) async fn find_product(state: &AppState, id: &str) -> AppResult<Product> {
    state
        .products()
        .find_by_id(parse_id(id)?)
        .await?
        .ok_or(AppError::NotFound)
}

pub(crate) fn bird_context(bird: &Bird, is_editing: bool) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("bird", bird);
    context.insert("is_editing", &is_editing);
    context
}

pub(crate) fn product_context(product: &Product, is_editing: bool) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("product", product);
    context.insert("is_editing", &is_editing);
    context
}
