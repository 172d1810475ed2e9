//! Request extractor for token-authenticated API calls.

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tower_sessions::cookie::Cookie;
use tracing::debug;

use super::AdminSession;
use super::token::TOKEN_COOKIE;
use crate::error::AppError;
use crate::state::AppState;
use crate::store::Repository;

/// An admin identified by a valid token who still exists in the store.
#[derive(Debug, Clone)]
pub struct ApiAdmin(pub AdminSession);

/// Token from the `Authorization: Bearer` header, else the token cookie.
pub fn request_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == TOKEN_COOKIE)
        .map(|c| c.value().to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

impl FromRequestParts<AppState> for ApiAdmin {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Response> {
        let Some(token) = request_token(parts) else {
            return Err(unauthorized("Unauthorized"));
        };

        let claims = state.tokens().verify(&token).map_err(|e| {
            debug!(error = %e, "rejected api token");
            unauthorized("Invalid token")
        })?;

        match state.admins().find_by_id(claims.sub).await {
            Ok(Some(admin)) => Ok(ApiAdmin(AdminSession::from_admin(&admin))),
            Ok(None) => {
                debug!(admin_id = %claims.sub, "token for a deleted admin");
                Err(unauthorized("Unauthorized"))
            }
            Err(e) => Err(AppError::from(e).into_response()),
        }
    }
}
