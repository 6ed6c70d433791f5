pub mod authors;
pub mod books;

use std::sync::Arc;

use thiserror::Error;

use shelf_authz::{Caller, TokenSet};
use shelf_cache::ListCache;
use shelf_http::error::AppError;
use shelf_kernel::settings::Settings;
use shelf_kernel::ModuleRegistry;
use shelf_store::{InMemoryStore, StoreError};

use authors::models::Author;
use authors::service::AuthorService;
use books::models::Book;
use books::service::BookService;

/// Shared mutable resources: the entity stores and the list cache.
///
/// Handed to both resource modules so a book can resolve its author and both
/// services invalidate the same cache under their own tags.
pub struct AppState {
    pub books: Arc<InMemoryStore<Book>>,
    pub authors: Arc<InMemoryStore<Author>>,
    pub cache: Arc<ListCache>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            books: Arc::new(InMemoryStore::new()),
            authors: Arc::new(InMemoryStore::new()),
            cache: Arc::new(ListCache::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure modes shared by the resource services.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource not found")]
    NotFound,
    #[error("payload validation failed")]
    Validation(Vec<serde_json::Value>),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize response payload")]
    Serialize(#[from] serde_json::Error),
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound => AppError::not_found("resource not found"),
            ResourceError::Validation(violations) => {
                AppError::validation(violations, "payload validation failed")
            }
            ResourceError::Store(e) => AppError::Internal(e.into()),
            ResourceError::Serialize(e) => AppError::Internal(e.into()),
        }
    }
}

/// Register all resource modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState, settings: &Settings) {
    registry.register(books::create_module(BookService::new(
        state.books.clone(),
        state.authors.clone(),
        state.cache.clone(),
        settings.api.validate_on_update,
    )));
    registry.register(authors::create_module(AuthorService::new(
        state.authors.clone(),
        state.cache.clone(),
        settings.api.validate_on_update,
    )));
}

/// Build the bearer-token table from settings
pub fn token_set(settings: &Settings) -> TokenSet {
    let mut tokens = TokenSet::new();
    for entry in &settings.auth.tokens {
        tokens.insert(
            entry.token.clone(),
            Caller::new(entry.subject.clone(), entry.roles.iter().cloned()),
        );
    }
    tokens
}
