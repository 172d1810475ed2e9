//! Contact form relay.

use axum::{Form, Router, extract::State, response::Response, routing::post};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::flash::Level;
use crate::services::{ContactInquiry, INQUIRY_SUBJECT};
use crate::state::AppState;

use super::helpers::{flash_all_redirect, flash_redirect};

pub const SENT: &str = "Email Was Sent Successfully";
pub const SEND_FAILED: &str = "Problem Sending The Email";

/// Create the contact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/send", post(send_inquiry))
}

async fn send_inquiry(
    State(state): State<AppState>,
    session: Session,
    Form(inquiry): Form<ContactInquiry>,
) -> Response {
    if let Err(errors) = inquiry.validate() {
        return flash_all_redirect(&session, Level::Danger, errors.into_messages(), "/contact").await;
    }

    let Some(mailer) = state.mailer() else {
        warn!("contact form submitted but no mailer is configured");
        return flash_redirect(&session, Level::Danger, SEND_FAILED, "/contact").await;
    };

    match mailer
        .send_html(state.contact_recipient(), INQUIRY_SUBJECT, &inquiry.to_html())
        .await
    {
        Ok(()) => {
            info!(from = %inquiry.email.trim(), "contact inquiry sent");
            flash_redirect(&session, Level::Success, SENT, "/contact").await
        }
        Err(e) => {
            warn!(error = %e, "failed to send contact inquiry");
            flash_redirect(&session, Level::Danger, SEND_FAILED, "/contact").await
        }
    }
}
