//! Admin accounts API: login, logout, registration and management.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_sessions::Session;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};
use tracing::{error, info, warn};

use crate::auth::{ApiAdmin, AdminSession, AuthError, Credentials, TOKEN_COOKIE, TOKEN_LIFETIME};
use crate::error::{AppError, AppResult};
use crate::flash::Level;
use crate::models::{Admin, AdminInput};
use crate::state::AppState;
use crate::store::StoreError;

use super::helpers::{flash_all_redirect, flash_redirect, parse_id};

pub const LOGIN_PROBLEM: &str = "There was a problem logging in";
pub const LOGGED_OUT: &str = "You are now logged out";
pub const REGISTERED: &str = "New Admin was Registered Successfully";
pub const UPDATED: &str = "Admin was Updated Successfully";
pub const USERNAME_TAKEN: &str = "Username is already taken";

/// Create the admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admins", get(list_admins))
        .route("/api/admins/login", post(login))
        .route("/api/admins/logout", get(logout))
        .route("/api/admins/register", post(register))
        .route("/api/admins/register/{id}", post(update))
        .route("/api/admins/{id}", get(get_admin).delete(delete_admin))
}

/// `Set-Cookie` value carrying a fresh token.
fn token_cookie(token: String, secure: bool) -> Option<HeaderValue> {
    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(TOKEN_LIFETIME))
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// `Set-Cookie` value that expires the token cookie.
fn expired_token_cookie() -> Option<HeaderValue> {
    let mut cookie = Cookie::build((TOKEN_COOKIE, "")).path("/").build();
    cookie.make_removal();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

fn with_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    if let Some(value) = cookie {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(credentials): Form<Credentials>,
) -> Response {
    let admin = match state.authenticator().authenticate(&credentials).await {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            let message = AuthError::InvalidCredentials.to_string();
            return flash_redirect(&session, Level::Danger, &message, "/login").await;
        }
        Err(AuthError::Store(e)) => {
            error!(error = %e, "login failed on store error");
            return flash_redirect(&session, Level::Danger, LOGIN_PROBLEM, "/login").await;
        }
    };

    if let Err(e) = admin.store(&session).await {
        error!(error = %e, "failed to write login session");
        return flash_redirect(&session, Level::Danger, LOGIN_PROBLEM, "/login").await;
    }

    let token = match state.tokens().issue(&admin) {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "failed to issue token");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Failed to create token" })),
            )
                .into_response();
        }
    };

    info!(admin_id = %admin.id, username = %admin.username, "admin logged in");
    with_cookie(
        Redirect::to("/admin-panel").into_response(),
        token_cookie(token, state.cookie_secure()),
    )
}

async fn logout(session: Session) -> Response {
    if let Some(admin) = AdminSession::load(&session).await {
        info!(username = %admin.username, "admin logged out");
    }
    if let Err(e) = AdminSession::clear(&session).await {
        warn!(error = %e, "failed to clear session on logout");
    }

    let response = flash_redirect(&session, Level::Success, LOGGED_OUT, "/login").await;
    with_cookie(response, expired_token_cookie())
}

async fn register(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    Form(input): Form<AdminInput>,
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

    let admin = Admin::new(&fields.username, &fields.password, Some(&caller.username))?;
    match state.admins().save(&admin).await {
        Ok(()) => {
            info!(admin_id = %admin.id, username = %admin.username, added_by = %caller.username, "admin registered");
            Ok(flash_redirect(&session, Level::Success, REGISTERED, "/admin-panel").await)
        }
        Err(StoreError::Conflict(_)) => {
            Ok(flash_redirect(&session, Level::Danger, USERNAME_TAKEN, "/admin-panel").await)
        }
        Err(e) => Err(e.into()),
    }
}

async fn update(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    session: Session,
    Path(id): Path<String>,
    Form(input): Form<AdminInput>,
) -> AppResult<Response> {
    let id = parse_id(&id)?;
    let back = format!("/admins/{id}/edit");

    let fields = match input.validate() {
        Ok(fields) => fields,
        Err(errors) => {
            return Ok(
                flash_all_redirect(&session, Level::Danger, errors.into_messages(), &back).await,
            );
        }
    };

    let mut admin = state
        .admins()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    admin.apply(&fields, &caller.username)?;

    match state.admins().save(&admin).await {
        Ok(()) => {
            info!(admin_id = %admin.id, updated_by = %caller.username, "admin updated");
            Ok(flash_redirect(&session, Level::Success, UPDATED, "/admin-panel").await)
        }
        Err(StoreError::Conflict(_)) => {
            Ok(flash_redirect(&session, Level::Danger, USERNAME_TAKEN, &back).await)
        }
        Err(e) => Err(e.into()),
    }
}

async fn list_admins(
    State(state): State<AppState>,
    _caller: ApiAdmin,
) -> AppResult<Json<Vec<Admin>>> {
    Ok(Json(state.admins().find_all().await?))
}

async fn get_admin(
    State(state): State<AppState>,
    _caller: ApiAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<Admin>> {
    let admin = state
        .admins()
        .find_by_id(parse_id(&id)?)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(admin))
}

async fn delete_admin(
    State(state): State<AppState>,
    ApiAdmin(caller): ApiAdmin,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let deleted = match parse_id(&id) {
        Ok(id) => state.admins().delete(id).await?,
        Err(_) => false,
    };

    if deleted {
        info!(admin_id = %id, deleted_by = %caller.username, "admin deleted");
        Ok(Json(json!({ "success": true })).into_response())
    } else {
        Ok((StatusCode::NOT_FOUND, Json(json!({ "success": false }))).into_response())
    }
}
