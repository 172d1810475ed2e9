//! Trailing-slash normalisation.

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Permanently redirect `/path/` to `/path`, keeping the query string.
///
/// The site root is left alone.
pub async fn redirect_trailing_slash(request: Request<Body>, next: Next) -> Response {
    let Some(target) = canonical_location(request.uri().path(), request.uri().query()) else {
        return next.run(request).await;
    };

    tracing::debug!(from = %request.uri(), to = %target, "trailing slash redirect");

    match HeaderValue::from_str(&target) {
        Ok(location) => (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response(),
        Err(_) => next.run(request).await,
    }
}

/// Redirect target for a path ending in one or more slashes.
pub fn canonical_location(path: &str, query: Option<&str>) -> Option<String> {
    if path.len() <= 1 || !path.ends_with('/') {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    // "//" and friends collapse to the root
    let trimmed = if trimmed.is_empty() { "/" } else { trimmed };

    Some(match query {
        Some(q) if !q.is_empty() => format!("{trimmed}?{q}"),
        _ => trimmed.to_string(),
    })
}
