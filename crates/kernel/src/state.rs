//! Application state shared across all handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::auth::{Authenticator, PasswordAuthenticator, TokenService};
use crate::config::Config;
use crate::db;
use crate::file::{FileStorage, LocalFileStorage, UploadPolicy};
use crate::models::{Admin, Bird, Product};
use crate::services::{Mailer, SmtpMailer};
use crate::store::{
    AdminRepository, MemoryRepository, PgAdminRepository, PgBirdRepository, PgProductRepository,
    Repository,
};
use crate::theme::ThemeEngine;

/// The three record stores.
#[derive(Clone)]
pub struct Stores {
    pub birds: Arc<dyn Repository<Bird>>,
    pub products: Arc<dyn Repository<Product>>,
    pub admins: Arc<dyn AdminRepository>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            birds: Arc::new(PgBirdRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            admins: Arc::new(PgAdminRepository::new(pool)),
        }
    }

    /// Empty in-memory stores.
    pub fn in_memory() -> Self {
        Self {
            birds: Arc::new(MemoryRepository::<Bird>::new()),
            products: Arc::new(MemoryRepository::<Product>::new()),
            admins: Arc::new(MemoryRepository::<Admin>::new()),
        }
    }
}

/// Everything needed to assemble an [`AppState`] by hand.
pub struct StateParts {
    pub stores: Stores,
    pub theme: ThemeEngine,
    pub files: Arc<dyn FileStorage>,
    pub upload_policy: UploadPolicy,
    pub jwt_secret: String,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub contact_recipient: String,
    pub cookie_secure: bool,
    pub static_dir: PathBuf,
    pub uploads_dir: PathBuf,
}

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    stores: Stores,

    /// Theme engine for template rendering.
    theme: ThemeEngine,

    /// Storage for bird photos.
    files: Arc<dyn FileStorage>,

    upload_policy: UploadPolicy,

    /// API token signer.
    tokens: TokenService,

    authenticator: Arc<dyn Authenticator>,

    /// Contact form mailer (available when SMTP_HOST is configured).
    mailer: Option<Arc<dyn Mailer>>,

    contact_recipient: String,

    /// Whether the token cookie is marked Secure.
    cookie_secure: bool,

    static_dir: PathBuf,
    uploads_dir: PathBuf,
}

impl AppState {
    /// Connect to PostgreSQL, apply migrations, and load templates.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
        info!("database ready");

        let theme = ThemeEngine::new(&config.templates_dir, &config.uploads_url)
            .context("failed to load templates")?;

        let mailer = SmtpMailer::from_config(config)
            .context("failed to configure SMTP")?
            .map(|m| Arc::new(m) as Arc<dyn Mailer>);
        if mailer.is_none() {
            info!("SMTP_HOST not set; contact form email is disabled");
        }

        let files = Arc::new(LocalFileStorage::new(
            &config.uploads_dir,
            config.uploads_url.clone(),
        ));

        Ok(Self::from_parts(StateParts {
            stores: Stores::postgres(pool),
            theme,
            files,
            upload_policy: UploadPolicy::default(),
            jwt_secret: config.jwt_secret.clone(),
            mailer,
            contact_recipient: config.contact_recipient.clone(),
            cookie_secure: config.cookie_secure,
            static_dir: config.static_dir.clone(),
            uploads_dir: config.uploads_dir.clone(),
        }))
    }

    pub fn from_parts(parts: StateParts) -> Self {
        let authenticator = Arc::new(PasswordAuthenticator::new(parts.stores.admins.clone()));

        Self {
            inner: Arc::new(AppStateInner {
                stores: parts.stores,
                theme: parts.theme,
                files: parts.files,
                upload_policy: parts.upload_policy,
                tokens: TokenService::new(parts.jwt_secret.as_bytes()),
                authenticator,
                mailer: parts.mailer,
                contact_recipient: parts.contact_recipient,
                cookie_secure: parts.cookie_secure,
                static_dir: parts.static_dir,
                uploads_dir: parts.uploads_dir,
            }),
        }
    }

    pub fn birds(&self) -> &dyn Repository<Bird> {
        self.inner.stores.birds.as_ref()
    }

    pub fn products(&self) -> &dyn Repository<Product> {
        self.inner.stores.products.as_ref()
    }

    pub fn admins(&self) -> &dyn AdminRepository {
        self.inner.stores.admins.as_ref()
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.inner.theme
    }

    pub fn files(&self) -> &dyn FileStorage {
        self.inner.files.as_ref()
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.inner.upload_policy
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.inner.authenticator.as_ref()
    }

    pub fn mailer(&self) -> Option<&dyn Mailer> {
        self.inner.mailer.as_deref()
    }

    pub fn contact_recipient(&self) -> &str {
        &self.inner.contact_recipient
    }

    pub fn cookie_secure(&self) -> bool {
        self.inner.cookie_secure
    }

    pub fn static_dir(&self) -> &Path {
        &self.inner.static_dir
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.inner.uploads_dir
    }
}
