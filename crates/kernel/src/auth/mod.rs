//! Admin authentication.
//!
//! Browser pages use the session; the JSON API accepts the signed token
//! issued at login (cookie or bearer header).

pub mod extract;
pub mod token;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::Admin;
use crate::store::{AdminRepository, Repository, StoreError};

pub use extract::ApiAdmin;
pub use token::{TOKEN_COOKIE, TOKEN_LIFETIME, TokenClaims, TokenService};

/// Session key for the logged-in admin's id.
pub const SESSION_ADMIN_ID: &str = "admin_id";

/// Session key for the logged-in admin's username.
pub const SESSION_ADMIN_USERNAME: &str = "admin_username";

/// Message shown for unknown users and wrong passwords alike.
pub const INVALID_CREDENTIALS: &str = "Incorrect username or password";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{INVALID_CREDENTIALS}")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The identity carried by a logged-in session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminSession {
    pub id: Uuid,
    pub username: String,
}

impl AdminSession {
    pub fn from_admin(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username.clone(),
        }
    }

    /// Read the admin identity from the session, if any.
    pub async fn load(session: &Session) -> Option<Self> {
        let id: Uuid = session.get(SESSION_ADMIN_ID).await.ok().flatten()?;
        let username: String = session
            .get(SESSION_ADMIN_USERNAME)
            .await
            .ok()
            .flatten()?;
        Some(Self { id, username })
    }

    /// Resolve the session's admin against the store.
    ///
    /// The username comes from the stored record. A session whose admin no
    /// longer exists is cleared and treated as logged out.
    pub async fn current(
        session: &Session,
        admins: &dyn AdminRepository,
    ) -> Result<Option<Self>, StoreError> {
        let Some(stored) = Self::load(session).await else {
            return Ok(None);
        };

        match admins.find_by_id(stored.id).await? {
            Some(admin) => Ok(Some(Self::from_admin(&admin))),
            None => {
                info!(admin_id = %stored.id, username = %stored.username, "session admin no longer exists");
                if let Err(e) = Self::clear(session).await {
                    warn!(error = %e, "failed to clear stale admin session");
                }
                Ok(None)
            }
        }
    }

    /// Write the identity into the session, rotating the session id.
    pub async fn store(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.cycle_id().await?;
        session.insert(SESSION_ADMIN_ID, self.id).await?;
        session.insert(SESSION_ADMIN_USERNAME, &self.username).await?;
        Ok(())
    }

    /// Remove any admin identity from the session.
    pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.remove::<Uuid>(SESSION_ADMIN_ID).await?;
        session.remove::<String>(SESSION_ADMIN_USERNAME).await?;
        session.cycle_id().await
    }
}

/// Checks credentials against the admin store.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AdminSession, AuthError>;
}

/// Argon2 password check over an [`AdminRepository`].
#[derive(Clone)]
pub struct PasswordAuthenticator {
    admins: Arc<dyn AdminRepository>,
}

impl PasswordAuthenticator {
    pub fn new(admins: Arc<dyn AdminRepository>) -> Self {
        Self { admins }
    }
}

#[async_trait]
impl Authenticator for PasswordAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AdminSession, AuthError> {
        let username = credentials.username.trim();
        let Some(admin) = self.admins.find_by_username(username).await? else {
            debug!(username = %username, "login for unknown admin");
            return Err(AuthError::InvalidCredentials);
        };

        if !admin.verify_password(&credentials.password) {
            debug!(username = %username, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(admin_id = %admin.id, username = %admin.username, "admin authenticated");
        Ok(AdminSession::from_admin(&admin))
    }
}
