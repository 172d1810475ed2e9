//! In-memory repository for tests and local demos.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{AdminRepository, Entity, Repository, StoreError};
use crate::models::Admin;

/// Vec-backed repository guarded by a `parking_lot` lock.
pub struct MemoryRepository<T> {
    records: RwLock<Vec<T>>,
    available: AtomicBool,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate an outage: every call fails with `Unavailable` while false.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(format!(
                "{} store is offline",
                T::KIND
            )))
        }
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.check()?;
        let mut all = self.records.read().clone();
        all.sort_by(T::list_order);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.check()?;
        Ok(self.records.read().iter().find(|r| r.id() == id).cloned())
    }

    async fn save(&self, record: &T) -> Result<(), StoreError> {
        self.check()?;
        let mut records = self.records.write();

        if let Some(key) = record.unique_key() {
            let taken = records
                .iter()
                .any(|r| r.id() != record.id() && r.unique_key() == Some(key));
            if taken {
                return Err(StoreError::Conflict(format!(
                    "{} \"{key}\" already exists",
                    T::KIND
                )));
            }
        }

        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.check()?;
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[async_trait]
impl AdminRepository for MemoryRepository<Admin> {
    async fn find_by_username(&self, username: &str) -> Result<Option<Admin>, StoreError> {
        self.check()?;
        Ok(self
            .records
            .read()
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }
}
