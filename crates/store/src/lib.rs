//! Entity store capability for Shelf.
//!
//! Resource services depend on the [`EntityStore`] trait only; the in-memory
//! adapter in [`memory`] is the default backend, and a relational mapper can
//! satisfy the same contract through a thin adapter.

pub mod memory;
pub mod pagination;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::InMemoryStore;
pub use pagination::PageRequest;

/// A persistable record with a store-assigned integer identity.
///
/// An id of zero or less means "not yet persisted"; `insert` assigns the next
/// sequential id in that case, so iteration order by id is creation order.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn assign_id(&mut self, id: i64);
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// Minimal persistence capability the resource services need.
#[async_trait]
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Persist a new entity, assigning an id when it has none.
    /// Returns the stored entity.
    async fn insert(&self, entity: T) -> Result<T, StoreError>;

    /// Look up a single entity by id.
    async fn find(&self, id: i64) -> Result<Option<T>, StoreError>;

    /// Fetch one bounded page in creation (id) order.
    async fn find_page(&self, page: &PageRequest) -> Result<Vec<T>, StoreError>;

    /// Replace the stored entity with the same id.
    /// Returns `false` when no such entity exists.
    async fn update(&self, entity: T) -> Result<bool, StoreError>;

    /// Remove an entity by id. Returns `false` when no such entity exists.
    async fn remove(&self, id: i64) -> Result<bool, StoreError>;

    /// Number of stored entities.
    async fn count(&self) -> Result<usize, StoreError>;
}
