//! Tag-aware resource-list cache.
//!
//! One cache scope: serialized list pages keyed by (resource, page, limit),
//! each entry carrying a single tag for bulk invalidation. No TTL; entries
//! live until a mutation of the owning resource type drops the tag.

mod lock;

use std::collections::HashMap;
use std::future::Future;
use std::sync::RwLock;

use lock::{rw_read, rw_write};

const SOURCE: &str = "shelf_cache";

/// Cache key for one list page, e.g. `list-books-2-3`.
pub fn list_key(resource: &str, page: i64, limit: i64) -> String {
    format!("list-{resource}-{page}-{limit}")
}

struct Entry {
    tag: String,
    payload: String,
}

/// Key-value cache of serialized list payloads with tagged invalidation.
///
/// Safe for concurrent `get_or_compute`/`invalidate` calls. Concurrent misses
/// for the same key may each run their compute; the work is an idempotent
/// read and the last writer wins, so no single-flight guard is kept.
pub struct ListCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl ListCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the entry stored under `key` unchanged, or run `compute` once,
    /// store its result tagged with `tag`, and return it.
    ///
    /// Population happens inline in the read path; a miss pays the full
    /// compute cost before responding. The lock is never held across the
    /// compute future.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        tag: &str,
        compute: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(entry) = rw_read(&self.entries, SOURCE, "get").get(key) {
            tracing::debug!(target: SOURCE, key, "cache hit");
            return Ok(entry.payload.clone());
        }

        tracing::debug!(target: SOURCE, key, "cache miss");
        let payload = compute().await?;

        rw_write(&self.entries, SOURCE, "store").insert(
            key.to_string(),
            Entry {
                tag: tag.to_string(),
                payload: payload.clone(),
            },
        );

        Ok(payload)
    }

    /// Drop every entry stored under `tag`, regardless of key.
    /// Returns the number of entries removed.
    pub fn invalidate(&self, tag: &str) -> usize {
        let mut entries = rw_write(&self.entries, SOURCE, "invalidate");
        let before = entries.len();
        entries.retain(|_, entry| entry.tag != tag);
        let removed = before - entries.len();

        tracing::debug!(target: SOURCE, tag, removed, "invalidated tag");
        removed
    }

    /// Number of live entries, across all tags.
    pub fn entry_count(&self) -> usize {
        rw_read(&self.entries, SOURCE, "entry_count").len()
    }
}

impl Default for ListCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn fill(cache: &ListCache, key: &str, tag: &str, payload: &str) {
        let payload = payload.to_string();
        cache
            .get_or_compute(key, tag, || async move { Ok::<_, Infallible>(payload) })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn hit_returns_stored_payload_without_recompute() {
        let cache = ListCache::new();
        let computes = AtomicUsize::new(0);

        for _ in 0..3 {
            let payload = cache
                .get_or_compute(&list_key("books", 1, 3), "booksCache", || async {
                    computes.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, Infallible>("[1,2,3]".to_string())
                })
                .await
                .unwrap();
            assert_eq!(payload, "[1,2,3]");
        }

        assert_eq!(computes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_windows_get_distinct_entries() {
        let cache = ListCache::new();
        fill(&cache, &list_key("books", 1, 3), "booksCache", "page1").await;
        fill(&cache, &list_key("books", 2, 3), "booksCache", "page2").await;

        assert_eq!(cache.entry_count(), 2);

        let page2 = cache
            .get_or_compute(&list_key("books", 2, 3), "booksCache", || async {
                Ok::<_, Infallible>("fresh".to_string())
            })
            .await
            .unwrap();
        assert_eq!(page2, "page2");
    }

    #[tokio::test]
    async fn invalidate_drops_only_matching_tag() {
        let cache = ListCache::new();
        fill(&cache, &list_key("books", 1, 3), "booksCache", "b1").await;
        fill(&cache, &list_key("books", 2, 3), "booksCache", "b2").await;
        fill(&cache, &list_key("authors", 1, 3), "authorsCache", "a1").await;

        assert_eq!(cache.invalidate("booksCache"), 2);
        assert_eq!(cache.entry_count(), 1);

        // The surviving author entry still hits.
        let payload = cache
            .get_or_compute(&list_key("authors", 1, 3), "authorsCache", || async {
                Ok::<_, Infallible>("fresh".to_string())
            })
            .await
            .unwrap();
        assert_eq!(payload, "a1");
    }

    #[tokio::test]
    async fn compute_errors_are_not_cached() {
        let cache = ListCache::new();

        let result = cache
            .get_or_compute(&list_key("books", 1, 3), "booksCache", || async {
                Err::<String, &str>("backend down")
            })
            .await;
        assert!(result.is_err());
        assert_eq!(cache.entry_count(), 0);

        fill(&cache, &list_key("books", 1, 3), "booksCache", "ok").await;
        assert_eq!(cache.entry_count(), 1);
    }
}
