use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use shelf_authz::{authorize, Action, Caller, ResourceKind};
use shelf_http::error::AppError;
use shelf_store::PageRequest;

use super::models::{BookPayload, BookUpdate, BookView};
use super::service::BookService;

pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

/// Raw pagination query parameters; parsing fails soft.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl ListQuery {
    fn window(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }
}

async fn list_books(
    State(service): State<BookService>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let payload = service.list_page(query.window()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}

async fn get_book(
    State(service): State<BookService>,
    Path(id): Path<i64>,
) -> Result<Json<BookView>, AppError> {
    service
        .get_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("book {id} not found")))
}

async fn create_book(
    State(service): State<BookService>,
    Extension(caller): Extension<Caller>,
    Json(payload): Json<BookPayload>,
) -> Result<Response, AppError> {
    authorize(&caller, Action::Create, ResourceKind::Books)?;

    let view = service.create(payload).await?;
    let location = format!("/api/books/{}", view.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(view),
    )
        .into_response())
}

async fn update_book(
    State(service): State<BookService>,
    Path(id): Path<i64>,
    Json(payload): Json<BookUpdate>,
) -> Result<StatusCode, AppError> {
    service.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(service): State<BookService>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&caller, Action::Delete, ResourceKind::Books)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
