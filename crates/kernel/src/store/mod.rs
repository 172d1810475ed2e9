//! Record stores.
//!
//! Handlers talk to [`Repository`] trait objects so the PostgreSQL stores
//! can be swapped for in-memory ones in tests.

pub mod memory;
pub mod postgres;

use std::cmp::Ordering;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Admin, Bird, Product};

pub use memory::MemoryRepository;
pub use postgres::{PgAdminRepository, PgBirdRepository, PgProductRepository};

/// Errors returned by record stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A unique field collided with another record.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Database(err),
        }
    }
}

/// A storable record.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Record kind used in log fields and messages.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Order returned by `find_all`.
    fn list_order(a: &Self, b: &Self) -> Ordering;

    /// Value that must be unique across records, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

impl Entity for Bird {
    const KIND: &'static str = "bird";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.breed.cmp(&b.breed)
    }
}

impl Entity for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }
}

impl Entity for Admin {
    const KIND: &'static str = "admin";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_order(a: &Self, b: &Self) -> Ordering {
        a.username.cmp(&b.username)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.username)
    }
}

/// CRUD access to one record kind.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// All records in the kind's list order.
    async fn find_all(&self) -> Result<Vec<T>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError>;

    /// Insert or replace by id. Last write wins.
    async fn save(&self, record: &T) -> Result<(), StoreError>;

    /// Delete by id; `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Connectivity check used by `/health`.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Admin store with username lookup for login.
#[async_trait]
pub trait AdminRepository: Repository<Admin> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError>;
}
