#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Public pages, catalog listings and site-wide middleware.

use axum::http::{StatusCode, header};

mod common;
use common::{TestApp, location, response_json, response_text};

// =============================================================================
// Informational pages
// =============================================================================

#[tokio::test]
async fn informational_pages_render() {
    let app = TestApp::new();

    for (path, heading) in [
        ("/", "Copsewood Aviaries"),
        ("/about", "About Us"),
        ("/contact", "Contact"),
        ("/login", "Admin Login"),
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let html = response_text(response).await;
        assert!(html.contains(heading), "{path} should contain {heading}");
    }
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let app = TestApp::new();
    let response = app.get("/nests").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn trailing_slash_redirects_permanently() {
    let app = TestApp::new();

    let response = app.get("/birds/?page=2").await;
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(location(&response), "/birds?page=2");

    let root = app.get("/").await;
    assert_eq!(root.status(), StatusCode::OK);
}

// =============================================================================
// Bird listing
// =============================================================================

#[tokio::test]
async fn bird_listing_filters_by_breed_and_sorts_by_price() {
    let app = TestApp::new();
    app.seed_bird("Parrot", Some("Polly"), 120.0).await;
    app.seed_bird("Finch", Some("Pip"), 20.0).await;
    app.seed_bird("Parrot", Some("Kiwi"), 45.5).await;

    let response = app.get("/birds?categories=Parrot&sortby=price%20asc").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;

    assert!(!html.contains("Pip"), "finches are filtered out");
    let kiwi = html.find("Kiwi").expect("Kiwi listed");
    let polly = html.find("Polly").expect("Polly listed");
    assert!(kiwi < polly, "cheaper bird comes first");
    assert!(html.contains("$45.50"));
    assert!(html.contains("2 results"));
}

#[tokio::test]
async fn bird_listing_offers_every_breed_as_a_filter() {
    let app = TestApp::new();
    app.seed_bird("Parrot", None, 120.0).await;
    app.seed_bird("Finch", None, 20.0).await;

    let html = response_text(app.get("/birds?categories=Finch").await).await;
    assert!(html.contains(r#"value="Parrot""#));
    assert!(html.contains(r#"value="Finch" checked"#));
}

#[tokio::test]
async fn unnamed_birds_are_titled_by_breed() {
    let app = TestApp::new();
    let bird = app.seed_bird("Lovebird", None, 60.0).await;

    let response = app.get(&format!("/birds/{}", bird.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("<title>Lovebird | Copsewood Aviaries</title>"));
}

#[tokio::test]
async fn bird_details_for_missing_or_malformed_ids_are_not_found() {
    let app = TestApp::new();

    let missing = app.get(&format!("/birds/{}", uuid::Uuid::now_v7())).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = app.get("/birds/not-an-id").await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_listing_parameters_are_bad_requests() {
    let app = TestApp::new();

    for query in [
        "price=cheap",
        "price=90%2010",
        "sortby=colour",
        "sortby=price%20sideways",
        "page=0",
        "page=two",
    ] {
        let response = app.get(&format!("/birds?{query}")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{query}");
    }
}

// =============================================================================
// Product listing
// =============================================================================

#[tokio::test]
async fn product_listing_paginates() {
    let app = TestApp::new();
    for i in 0..12 {
        app.seed_product(&format!("Perch {i:02}"), Some("Perches"), 5.0 + i as f64)
            .await;
    }

    let first = response_text(app.get("/products?sortby=price").await).await;
    assert!(first.contains("12 results"));
    assert!(first.contains("Perch 00"));
    assert!(!first.contains("Perch 10"));
    assert!(first.contains("page=2"), "pager links to the next page");

    let second = response_text(app.get("/products?sortby=price&page=2").await).await;
    assert!(second.contains("Perch 10"));
    assert!(second.contains("Perch 11"));
    assert!(!second.contains("Perch 00"));
}

#[tokio::test]
async fn product_listing_applies_price_range() {
    let app = TestApp::new();
    app.seed_product("Seed Mix", Some("Food"), 8.0).await;
    app.seed_product("Large Cage", Some("Cages"), 240.0).await;
    app.seed_product("Cuttlebone", None, 3.0).await;

    let html = response_text(app.get("/products?price=5%20*").await).await;
    assert!(html.contains("Seed Mix"));
    assert!(html.contains("Large Cage"));
    assert!(!html.contains("Cuttlebone"));
}

#[tokio::test]
async fn page_past_the_end_renders_empty() {
    let app = TestApp::new();
    app.seed_product("Seed Mix", Some("Food"), 8.0).await;

    let response = app.get("/products?page=5").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response_text(response).await;
    assert!(html.contains("No products match your filters."));
}

// =============================================================================
// Static files and health
// =============================================================================

#[tokio::test]
async fn stylesheet_is_served_with_css_type() {
    let app = TestApp::new();
    let response = app.get("/static/css/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}

#[tokio::test]
async fn static_traversal_is_rejected() {
    let app = TestApp::new();
    let response = app.get("/static/..%2F..%2FCargo.toml").await;
    assert_ne!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_each_store() {
    let app = TestApp::new();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["birds"], true);

    app.products.set_available(false);
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = response_json(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["products"], false);
    assert_eq!(body["admins"], true);
}

#[tokio::test]
async fn store_outage_is_service_unavailable() {
    let app = TestApp::new();
    app.birds.set_available(false);
    let response = app.get("/birds").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
