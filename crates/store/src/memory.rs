//! In-memory entity store backed by an ordered map.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::pagination::PageRequest;
use crate::{Entity, EntityStore, StoreError};

/// Thread-safe in-memory store.
///
/// Rows live in a `BTreeMap` keyed by id, so page iteration naturally yields
/// creation order. Safe for concurrent use from unrelated requests; no lock
/// is held across an await point.
pub struct InMemoryStore<T> {
    rows: RwLock<BTreeMap<i64, T>>,
    next_id: AtomicI64,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> EntityStore<T> for InMemoryStore<T> {
    async fn insert(&self, mut entity: T) -> Result<T, StoreError> {
        if entity.id() <= 0 {
            entity.assign_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        }
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert"))?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn find(&self, id: i64) -> Result<Option<T>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("find"))?;
        Ok(rows.get(&id).cloned())
    }

    async fn find_page(&self, page: &PageRequest) -> Result<Vec<T>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_page"))?;
        Ok(rows
            .values()
            .skip(page.offset())
            .take(page.limit() as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, entity: T) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("update"))?;
        match rows.get_mut(&entity.id()) {
            Some(row) => {
                *row = entity;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: i64) -> Result<bool, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::LockPoisoned("remove"))?;
        Ok(rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::LockPoisoned("count"))?;
        Ok(rows.len())
    }
}
