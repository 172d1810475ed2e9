//! One-shot flash messages stored in the session.
//!
//! Messages are pushed before a redirect and drained by the next page render.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

const SESSION_FLASH: &str = "_flash";

/// Alert style for a message; templates render it as `alert-<level>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: Level,
    pub text: String,
}

/// Queue a message for the next render.
pub async fn push(session: &Session, level: Level, text: impl Into<String>) {
    let mut queued: Vec<FlashMessage> = session
        .get(SESSION_FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    queued.push(FlashMessage {
        level,
        text: text.into(),
    });

    if let Err(e) = session.insert(SESSION_FLASH, queued).await {
        warn!(error = %e, "failed to store flash message");
    }
}

/// Queue several messages at one level.
pub async fn push_all<I, S>(session: &Session, level: Level, texts: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for text in texts {
        push(session, level, text).await;
    }
}

/// Drain queued messages.
pub async fn take(session: &Session) -> Vec<FlashMessage> {
    session
        .remove::<Vec<FlashMessage>>(SESSION_FLASH)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
