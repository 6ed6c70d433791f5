use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;

use shelf_authz::{authorize, Action, Caller, ResourceKind};
use shelf_http::error::AppError;
use shelf_store::PageRequest;

use super::models::{AuthorPayload, AuthorUpdate, AuthorView};
use super::service::AuthorService;

pub fn router(service: AuthorService) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
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

async fn list_authors(
    State(service): State<AuthorService>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let payload = service.list_page(query.window()).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], payload).into_response())
}

async fn get_author(
    State(service): State<AuthorService>,
    Path(id): Path<i64>,
) -> Result<Json<AuthorView>, AppError> {
    service
        .get_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("author {id} not found")))
}

async fn create_author(
    State(service): State<AuthorService>,
    Json(payload): Json<AuthorPayload>,
) -> Result<Response, AppError> {
    let view = service.create(payload).await?;
    let location = format!("/api/authors/{}", view.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(view),
    )
        .into_response())
}

async fn update_author(
    State(service): State<AuthorService>,
    Path(id): Path<i64>,
    Json(payload): Json<AuthorUpdate>,
) -> Result<StatusCode, AppError> {
    service.update(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_author(
    State(service): State<AuthorService>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    authorize(&caller, Action::Delete, ResourceKind::Authors)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
