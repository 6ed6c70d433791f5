//! End-to-end tests driving the full router: authentication, role gating,
//! list caching, validation, and status-code contracts.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use shelf_app::modules::{self, AppState};
use shelf_authz::{Caller, TokenSet, ROLE_ADMIN};
use shelf_kernel::settings::Settings;
use shelf_kernel::ModuleRegistry;

const ADMIN: &str = "admin-token";
const READER: &str = "reader-token";

fn test_router() -> Router {
    let settings = Settings::default();
    let state = AppState::new();
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &state, &settings);

    let mut tokens = TokenSet::new();
    tokens.insert(
        ADMIN,
        Caller::new("admin@example.com", [ROLE_ADMIN.to_string()]),
    );
    tokens.insert(READER, Caller::new("reader@example.com", []));

    shelf_http::build_router(&registry, &settings, Arc::new(tokens))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

async fn create_book(router: &Router, title: &str, id_author: Option<i64>) -> Value {
    let mut payload = json!({"title": title, "coverText": format!("{title} cover")});
    if let Some(id) = id_author {
        payload["idAuthor"] = json!(id);
    }
    let response = send(
        router,
        request("POST", "/api/books", Some(ADMIN), Some(payload)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let router = test_router();

    let missing = send(&router, request("GET", "/api/books", None, None)).await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let unknown = send(&router, request("GET", "/api/books", Some("nope"), None)).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    // Health stays open.
    let health = send(&router, request("GET", "/healthz", None, None)).await;
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn write_protection_follows_the_role_table() {
    let router = test_router();

    // Book creation and deletion need the elevated role.
    let refused = send(
        &router,
        request(
            "POST",
            "/api/books",
            Some(READER),
            Some(json!({"title": "Nope"})),
        ),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let body = body_json(refused).await;
    assert_eq!(body["error"]["code"], "forbidden");

    let created = create_book(&router, "Guarded", None).await;
    let refused = send(
        &router,
        request(
            "DELETE",
            &format!("/api/books/{}", created["id"]),
            Some(READER),
            None,
        ),
    )
    .await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    // Author creation and updates are open to any authenticated caller.
    let response = send(
        &router,
        request(
            "POST",
            "/api/authors",
            Some(READER),
            Some(json!({"name": "Tolkien", "firstName": "John"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let refused = send(&router, request("DELETE", "/api/authors/1", Some(READER), None)).await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let allowed = send(&router, request("DELETE", "/api/authors/1", Some(ADMIN), None)).await;
    assert_eq!(allowed.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn create_returns_location_and_resolves_the_author() {
    let router = test_router();

    let author_response = send(
        &router,
        request(
            "POST",
            "/api/authors",
            Some(READER),
            Some(json!({"name": "Tolkien", "firstName": "John"})),
        ),
    )
    .await;
    assert_eq!(author_response.status(), StatusCode::CREATED);
    assert_eq!(
        author_response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/api/authors/1")
    );

    let response = send(
        &router,
        request(
            "POST",
            "/api/books",
            Some(ADMIN),
            Some(json!({"title": "The Hobbit", "idAuthor": 1})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/api/books/1")
    );
    let body = body_json(response).await;
    assert_eq!(body["author"]["name"], "Tolkien");

    // An unresolvable author id is not an error; the relation is nulled.
    let orphan = create_book(&router, "Orphan", Some(99)).await;
    assert_eq!(orphan["author"], Value::Null);
}

#[tokio::test]
async fn list_pages_are_cached_until_a_write() {
    let router = test_router();
    for i in 1..=5 {
        create_book(&router, &format!("Book {i}"), None).await;
    }

    let first = body_string(send(&router, request("GET", "/api/books?page=1&limit=3", Some(READER), None)).await).await;
    let second = body_string(send(&router, request("GET", "/api/books?page=1&limit=3", Some(READER), None)).await).await;
    assert_eq!(first, second);

    let page1: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(page1.as_array().unwrap().len(), 3);
    assert_eq!(page1[0]["title"], "Book 1");
    assert_eq!(page1[2]["title"], "Book 3");

    let page2 = body_json(send(&router, request("GET", "/api/books?page=2&limit=3", Some(READER), None)).await).await;
    assert_eq!(page2.as_array().unwrap().len(), 2);
    assert_eq!(page2[1]["title"], "Book 5");

    // Non-numeric parameters fall back to page 1, limit 3.
    let defaulted = body_json(send(&router, request("GET", "/api/books?page=x&limit=y", Some(READER), None)).await).await;
    assert_eq!(defaulted.as_array().unwrap().len(), 3);

    // A write invalidates every cached page of the resource type.
    create_book(&router, "Book 6", None).await;
    let refreshed = body_json(send(&router, request("GET", "/api/books?page=2&limit=3", Some(READER), None)).await).await;
    assert_eq!(refreshed.as_array().unwrap().len(), 3);
    assert_eq!(refreshed[2]["title"], "Book 6");
}

#[tokio::test]
async fn author_writes_refresh_cached_book_lists() {
    let router = test_router();

    let created = send(
        &router,
        request(
            "POST",
            "/api/authors",
            Some(READER),
            Some(json!({"name": "Tolkien", "firstName": "John"})),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    create_book(&router, "The Hobbit", Some(1)).await;

    // Warm the book list cache with the embedded author.
    let warm = body_json(send(&router, request("GET", "/api/books", Some(READER), None)).await).await;
    assert_eq!(warm[0]["author"]["name"], "Tolkien");

    let renamed = send(
        &router,
        request(
            "PUT",
            "/api/authors/1",
            Some(READER),
            Some(json!({"name": "Renamed"})),
        ),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::NO_CONTENT);

    let refreshed = body_json(send(&router, request("GET", "/api/books", Some(READER), None)).await).await;
    assert_eq!(refreshed[0]["author"]["name"], "Renamed");

    // Deleting the author drops the cached page as well; the relation nulls.
    let deleted = send(&router, request("DELETE", "/api/authors/1", Some(ADMIN), None)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let orphaned = body_json(send(&router, request("GET", "/api/books", Some(READER), None)).await).await;
    assert_eq!(orphaned[0]["author"], Value::Null);
}

#[tokio::test]
async fn validation_failures_return_details_and_persist_nothing() {
    let router = test_router();

    let response = send(
        &router,
        request(
            "POST",
            "/api/books",
            Some(ADMIN),
            Some(json!({"coverText": "no title"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"][0]["field"], "title");

    let list = body_json(send(&router, request("GET", "/api/books", Some(READER), None)).await).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    let response = send(
        &router,
        request("POST", "/api/authors", Some(READER), Some(json!({}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_resources_yield_not_found() {
    let router = test_router();

    let missing = send(&router, request("GET", "/api/books/99", Some(READER), None)).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let updated = send(
        &router,
        request(
            "PUT",
            "/api/books/99",
            Some(READER),
            Some(json!({"title": "Ghost"})),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::NOT_FOUND);

    let deleted = send(&router, request("DELETE", "/api/books/99", Some(ADMIN), None)).await;
    assert_eq!(deleted.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let router = test_router();
    let created = create_book(&router, "First Edition", None).await;
    let id = created["id"].as_i64().unwrap();

    let updated = send(
        &router,
        request(
            "PUT",
            &format!("/api/books/{id}"),
            Some(READER),
            Some(json!({"comment": "revised"})),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::NO_CONTENT);

    let detail = body_json(send(&router, request("GET", &format!("/api/books/{id}"), Some(READER), None)).await).await;
    assert_eq!(detail["title"], "First Edition");
    assert_eq!(detail["comment"], "revised");

    let deleted = send(&router, request("DELETE", &format!("/api/books/{id}"), Some(ADMIN), None)).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = send(&router, request("GET", &format!("/api/books/{id}"), Some(READER), None)).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
