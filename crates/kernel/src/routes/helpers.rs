//! Shared route helpers for page rendering.

use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;
use uuid::Uuid;

use crate::auth::AdminSession;
use crate::error::{AppError, AppResult};
use crate::flash::{self, Level};
use crate::state::AppState;

/// Flash shown when a guarded page is requested without a session.
pub const LOGIN_REQUIRED: &str = "You Must Be Logged In To Access This Page";

/// Require a logged-in admin, or flash and redirect to the login page.
///
/// Sessions of deleted admins are cleared and redirected too.
pub async fn require_admin(state: &AppState, session: &Session) -> Result<AdminSession, Response> {
    match AdminSession::current(session, state.admins()).await {
        Ok(Some(admin)) => Ok(admin),
        Ok(None) => {
            flash::push(session, Level::Danger, LOGIN_REQUIRED).await;
            Err(Redirect::to("/login").into_response())
        }
        Err(e) => Err(AppError::from(e).into_response()),
    }
}

/// Render a page template.
///
/// Adds `title`, queued flash `messages` and the logged-in `current_admin`.
pub async fn render_page(
    state: &AppState,
    session: &Session,
    template: &str,
    title: &str,
    mut context: tera::Context,
) -> AppResult<Response> {
    context.insert("title", title);
    context.insert("messages", &flash::take(session).await);
    let current_admin = AdminSession::current(session, state.admins()).await?;
    context.insert("current_admin", &current_admin);

    let html = state.theme().render(template, &context).map_err(|e| {
        tracing::error!(error = ?e, template = %template, "failed to render template");
        AppError::Template(e)
    })?;
    Ok(Html(html).into_response())
}

/// Flash one message and redirect.
pub async fn flash_redirect(session: &Session, level: Level, message: &str, to: &str) -> Response {
    flash::push(session, level, message).await;
    Redirect::to(to).into_response()
}

/// Flash several messages and redirect.
pub async fn flash_all_redirect(
    session: &Session,
    level: Level,
    messages: Vec<String>,
    to: &str,
) -> Response {
    flash::push_all(session, level, messages).await;
    Redirect::to(to).into_response()
}

/// Parse a path id; malformed ids are treated as missing records.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
