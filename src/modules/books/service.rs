use std::sync::Arc;

use shelf_cache::{list_key, ListCache};
use shelf_store::{EntityStore, PageRequest};

use super::models::{title_violations, Book, BookPayload, BookUpdate, BookView};
use crate::modules::authors::models::{Author, AuthorView};
use crate::modules::ResourceError;

/// Invalidation tag shared by every cached book list page.
pub const BOOKS_CACHE_TAG: &str = "booksCache";

/// Orchestrates book reads and writes against the stores and the list cache.
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn EntityStore<Book>>,
    authors: Arc<dyn EntityStore<Author>>,
    cache: Arc<ListCache>,
    validate_on_update: bool,
}

impl BookService {
    pub fn new(
        books: Arc<dyn EntityStore<Book>>,
        authors: Arc<dyn EntityStore<Author>>,
        cache: Arc<ListCache>,
        validate_on_update: bool,
    ) -> Self {
        Self {
            books,
            authors,
            cache,
            validate_on_update,
        }
    }

    /// Serialized page of books, from cache when warm.
    pub async fn list_page(&self, page: PageRequest) -> Result<String, ResourceError> {
        let key = list_key("books", page.page(), page.limit());
        self.cache
            .get_or_compute(&key, BOOKS_CACHE_TAG, || self.compute_page(page))
            .await
    }

    async fn compute_page(&self, page: PageRequest) -> Result<String, ResourceError> {
        let rows = self.books.find_page(&page).await?;
        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            views.push(self.view(row).await?);
        }
        Ok(serde_json::to_string(&views)?)
    }

    /// Direct store lookup, never cached.
    pub async fn get_one(&self, id: i64) -> Result<Option<BookView>, ResourceError> {
        match self.books.find(id).await? {
            Some(book) => Ok(Some(self.view(book).await?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, payload: BookPayload) -> Result<BookView, ResourceError> {
        let violations = payload.violations();
        if !violations.is_empty() {
            return Err(ResourceError::Validation(violations));
        }

        let author_id = self.resolve_author(payload.id_author).await?;
        let book = Book {
            id: 0,
            title: payload.title,
            cover_text: payload.cover_text,
            comment: payload.comment,
            author_id,
        };

        let book = self.books.insert(book).await?;
        self.cache.invalidate(BOOKS_CACHE_TAG);
        self.view(book).await
    }

    pub async fn update(&self, id: i64, payload: BookUpdate) -> Result<(), ResourceError> {
        let Some(mut book) = self.books.find(id).await? else {
            return Err(ResourceError::NotFound);
        };

        if let Some(title) = payload.title {
            book.title = title;
        }
        if let Some(cover_text) = payload.cover_text {
            book.cover_text = cover_text;
        }
        if let Some(comment) = payload.comment {
            book.comment = comment;
        }
        // The relation is re-resolved on every update, same as create; an
        // absent idAuthor nulls it.
        book.author_id = self.resolve_author(payload.id_author).await?;

        if self.validate_on_update {
            let violations = title_violations(&book.title);
            if !violations.is_empty() {
                return Err(ResourceError::Validation(violations));
            }
        }

        self.books.update(book).await?;
        self.cache.invalidate(BOOKS_CACHE_TAG);
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ResourceError> {
        if self.books.find(id).await?.is_none() {
            return Err(ResourceError::NotFound);
        }

        // Books drop their list cache before the row goes away; authors do
        // the reverse. Equivalent under tag invalidation, kept as the
        // documented per-type ordering.
        self.cache.invalidate(BOOKS_CACHE_TAG);
        self.books.remove(id).await?;
        Ok(())
    }

    /// Attach the matching author if any; an unresolvable id is not an error.
    async fn resolve_author(&self, id_author: Option<i64>) -> Result<Option<i64>, ResourceError> {
        let id = id_author.unwrap_or(-1);
        let author = self.authors.find(id).await?;
        if author.is_none() && id_author.is_some() {
            tracing::debug!(id_author = id, "book author did not resolve; nulling relation");
        }
        Ok(author.map(|author| author.id))
    }

    async fn view(&self, book: Book) -> Result<BookView, ResourceError> {
        let author = match book.author_id {
            Some(id) => self.authors.find(id).await?.map(AuthorView::from),
            None => None,
        };
        Ok(BookView {
            id: book.id,
            title: book.title,
            cover_text: book.cover_text,
            comment: book.comment,
            author,
        })
    }
}
