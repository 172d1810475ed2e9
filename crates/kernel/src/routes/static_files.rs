//! Static asset and uploaded image serving.

use std::path::Path as FsPath;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::fs;
use tracing::warn;

use crate::state::AppState;

/// Create the static files router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/static/{*path}", get(serve_static))
        .route("/uploads/{*path}", get(serve_upload))
}

async fn serve_static(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    serve_from(state.static_dir(), &path, "public, max-age=86400").await
}

async fn serve_upload(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    // Upload names are unique, so they never change once written.
    serve_from(state.uploads_dir(), &path, "public, max-age=604800, immutable").await
}

async fn serve_from(root: &FsPath, path: &str, cache_control: &'static str) -> Response {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.contains("..") || path.contains('\0') {
        return not_found();
    }

    let file_path = root.join(path);
    let content = match fs::read(&file_path).await {
        Ok(content) => content,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %file_path.display(), error = %e, "failed to read file");
            }
            return not_found();
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime_from_path(&file_path)),
            (header::CACHE_CONTROL, cache_control),
        ],
        Body::from(content),
    )
        .into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

pub(crate) fn mime_from_path(path: &FsPath) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
