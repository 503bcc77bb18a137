//! API integration tests
//!
//! Drive the full router in-process against an in-memory database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use booklist_server::{
    api,
    config::DatabaseConfig,
    repository::{self, Repository},
    services::Services,
    AppState,
};

async fn test_app() -> Router {
    let pool = repository::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    let repository = Repository::new(pool);
    repository
        .create_schema_if_absent()
        .await
        .expect("Failed to create schema");

    api::router(AppState {
        services: Arc::new(Services::new(repository)),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, value)
}

#[tokio::test]
async fn test_create_author() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/authors",
        Some(json!({"first_name": "Jane", "last_name": "Austen"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["author_id"].is_number());
    assert_eq!(body["first_name"], "Jane");
    assert_eq!(body["last_name"], "Austen");
}

#[tokio::test]
async fn test_create_author_invalid_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/authors",
        Some(json!({"first_name": "", "last_name": "Austen"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"]["first_name"][0], "First name is required.");

    let (status, body) = send(&app, Method::POST, "/api/authors", Some(json!({"first_name": 12}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["_schema"].is_array());
}

#[tokio::test]
async fn test_create_book_twice_rejects_duplicate_title() {
    let app = test_app().await;
    let payload = json!({"title": "Emma", "author": {"first_name": "Jane", "last_name": "Austen"}});

    let (status, body) = send(&app, Method::POST, "/api/books", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book created");
    assert_eq!(body["book"]["title"], "Emma");
    assert_eq!(body["book"]["author"]["last_name"], "Austen");

    let (status, body) = send(&app, Method::POST, "/api/books", Some(payload)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["title"][0], "A book with this title Emma already exists.");
}

#[tokio::test]
async fn test_create_book_reuses_existing_author() {
    let app = test_app().await;

    let (_, author) = send(
        &app,
        Method::POST,
        "/api/authors",
        Some(json!({"first_name": "Jane", "last_name": "Austen"})),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Emma", "author": {"first_name": "Jane", "last_name": "Austen"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["author"]["author_id"], author["author_id"]);

    let (_, authors) = send(&app, Method::GET, "/api/authors", None).await;
    assert_eq!(authors.as_array().unwrap().len(), 1);
    assert!(authors[0].get("books").is_none());
}

#[tokio::test]
async fn test_create_book_reports_nested_author_errors() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Emma", "author": {"first_name": "Jane"}})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["author.last_name"][0], "Missing data for required field.");
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let app = test_app().await;

    for (method, uri) in [
        (Method::POST, "/api/books"),
        (Method::POST, "/api/authors"),
        (Method::PUT, "/api/books/1"),
        (Method::PUT, "/api/authors/1"),
    ] {
        let (status, body) = send(&app, method.clone(), uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", method, uri);
        assert_eq!(body["message"], "No input data provided");

        let (status, _) = send(&app, method.clone(), uri, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} {} with {{}}", method, uri);
    }
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/books/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("9999"));

    let (status, _) = send(&app, Method::DELETE, "/api/books/9999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_json_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/books/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5);
    assert_eq!(body["error"], "NotFound");
    assert_eq!(body["message"], "Book abc doesn't exist");

    let (status, body) = send(&app, Method::DELETE, "/api/authors/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Author abc doesn't exist");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/books/1.5",
        Some(json!({"title": "Emma", "author": {"first_name": "Jane", "last_name": "Austen"}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book 1.5 doesn't exist");
}

#[tokio::test]
async fn test_update_book() {
    let app = test_app().await;

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Emma", "author": {"first_name": "Jane", "last_name": "Austen"}})),
    )
    .await;
    let id = created["book"]["id"].as_i64().unwrap();
    let author = created["book"]["author"].clone();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", id),
        Some(json!({"title": "Emma: A Novel", "author": author})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Emma: A Novel");
    assert_eq!(body["author"]["author_id"], created["book"]["author"]["author_id"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/books/9999",
        Some(json!({"title": "Nowhere", "author": {"first_name": "A", "last_name": "B"}})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/books/{}", id),
        Some(json!({"title": "Emma: A Novel"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_author() {
    let app = test_app().await;

    let (_, author) = send(
        &app,
        Method::POST,
        "/api/authors",
        Some(json!({"first_name": "Jane", "last_name": "Austen"})),
    )
    .await;
    let uri = format!("/api/authors/{}", author["author_id"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"first_name": "Charlotte", "middle_name": "E", "last_name": "Bronte"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author_id"], author["author_id"]);
    assert_eq!(body["middle_name"], "E");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"first_name": "Charlotte"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/authors/9999",
        Some(json!({"first_name": "A", "last_name": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_author_cascades_to_books() {
    let app = test_app().await;

    for title in ["Emma", "Persuasion"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/books",
            Some(json!({"title": title, "author": {"first_name": "Jane", "last_name": "Austen"}})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/books",
        Some(json!({"title": "Jane Eyre", "author": {"first_name": "Charlotte", "last_name": "Bronte"}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, books) = send(&app, Method::GET, "/api/books", None).await;
    let author_id = books[0]["author"]["author_id"].clone();
    let uri = format!("/api/authors/{}", author_id);

    let (status, detail) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["books"].as_array().unwrap().len(), 2);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, books) = send(&app, Method::GET, "/api/books", None).await;
    let titles: Vec<&str> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Jane Eyre"]);
}

#[tokio::test]
async fn test_health_and_docs() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books/{id}"].is_object());
}
