//! API handlers for the BookList REST endpoints

pub mod authors;
pub mod books;
pub mod health;
pub mod openapi;

use std::marker::PhantomData;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{Author, Book},
    validation::FieldErrors,
    AppState,
};

/// JSON request body that must carry data.
///
/// An empty body, `null`, `{}` or `[]` is rejected with
/// [`AppError::InputMissing`]; a body that is not JSON with
/// [`AppError::BadRequest`]; JSON of the wrong shape with a validation error
/// under `_schema`. The Content-Type header is not checked.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::InputMissing);
        }

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Malformed JSON body: {}", e)))?;

        let empty = match &value {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        };
        if empty {
            return Err(AppError::InputMissing);
        }

        serde_json::from_value(value)
            .map(JsonBody)
            .map_err(|e| AppError::Validation(FieldErrors::single("_schema", e.to_string())))
    }
}

/// Resource addressed by an `{id}` path segment
pub trait Resource {
    const NAME: &'static str;
}

impl Resource for Book {
    const NAME: &'static str = "Book";
}

impl Resource for Author {
    const NAME: &'static str = "Author";
}

/// Numeric `{id}` path segment of a resource.
///
/// An id that is not an integer cannot name a stored row, so it is rejected
/// with the same JSON 404 as an unknown id.
pub struct PathId<R>(pub i64, PhantomData<R>);

#[async_trait]
impl<S, R> FromRequestParts<S> for PathId<R>
where
    S: Send + Sync,
    R: Resource + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse()
            .map(|id| PathId(id, PhantomData))
            .map_err(|_| AppError::NotFound(format!("{} {} doesn't exist", R::NAME, raw)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
