use std::sync::Arc;

use shelf_cache::{list_key, ListCache};
use shelf_store::{EntityStore, PageRequest};

use super::models::{name_violations, Author, AuthorPayload, AuthorUpdate, AuthorView};
use crate::modules::books::service::BOOKS_CACHE_TAG;
use crate::modules::ResourceError;

/// Invalidation tag shared by every cached author list page.
pub const AUTHORS_CACHE_TAG: &str = "authorsCache";

/// Orchestrates author reads and writes against the store and the list cache.
#[derive(Clone)]
pub struct AuthorService {
    authors: Arc<dyn EntityStore<Author>>,
    cache: Arc<ListCache>,
    validate_on_update: bool,
}

impl AuthorService {
    pub fn new(
        authors: Arc<dyn EntityStore<Author>>,
        cache: Arc<ListCache>,
        validate_on_update: bool,
    ) -> Self {
        Self {
            authors,
            cache,
            validate_on_update,
        }
    }

    /// Serialized page of authors, from cache when warm.
    pub async fn list_page(&self, page: PageRequest) -> Result<String, ResourceError> {
        let key = list_key("authors", page.page(), page.limit());
        self.cache
            .get_or_compute(&key, AUTHORS_CACHE_TAG, || self.compute_page(page))
            .await
    }

    async fn compute_page(&self, page: PageRequest) -> Result<String, ResourceError> {
        let rows = self.authors.find_page(&page).await?;
        let views: Vec<AuthorView> = rows.into_iter().map(AuthorView::from).collect();
        Ok(serde_json::to_string(&views)?)
    }

    /// Direct store lookup, never cached.
    pub async fn get_one(&self, id: i64) -> Result<Option<AuthorView>, ResourceError> {
        Ok(self.authors.find(id).await?.map(AuthorView::from))
    }

    pub async fn create(&self, payload: AuthorPayload) -> Result<AuthorView, ResourceError> {
        let violations = payload.violations();
        if !violations.is_empty() {
            return Err(ResourceError::Validation(violations));
        }

        let author = Author {
            id: 0,
            name: payload.name,
            first_name: payload.first_name,
        };

        let author = self.authors.insert(author).await?;
        self.invalidate_lists();
        Ok(AuthorView::from(author))
    }

    pub async fn update(&self, id: i64, payload: AuthorUpdate) -> Result<(), ResourceError> {
        let Some(mut author) = self.authors.find(id).await? else {
            return Err(ResourceError::NotFound);
        };

        if let Some(name) = payload.name {
            author.name = name;
        }
        if let Some(first_name) = payload.first_name {
            author.first_name = first_name;
        }

        if self.validate_on_update {
            let violations = name_violations(&author.name, &author.first_name);
            if !violations.is_empty() {
                return Err(ResourceError::Validation(violations));
            }
        }

        self.authors.update(author).await?;
        self.invalidate_lists();
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ResourceError> {
        if self.authors.find(id).await?.is_none() {
            return Err(ResourceError::NotFound);
        }

        // Authors remove the row first and drop the list cache after; books
        // do the reverse. Equivalent under tag invalidation, kept as the
        // documented per-type ordering.
        self.authors.remove(id).await?;
        self.invalidate_lists();
        Ok(())
    }

    /// Cached book list pages embed the author view, so every author
    /// mutation drops both tags.
    fn invalidate_lists(&self) {
        self.cache.invalidate(AUTHORS_CACHE_TAG);
        self.cache.invalidate(BOOKS_CACHE_TAG);
    }
}
