//! Author API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::{Author, AuthorDetail, AuthorPayload},
    AppState,
};

use super::{JsonBody, PathId};

/// List all authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 201, description = "The author has been created", body = Author),
        (status = 400, description = "No input data provided or invalid author", body = ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    body: Result<JsonBody<AuthorPayload>, AppError>,
) -> AppResult<(StatusCode, Json<Author>)> {
    // Every payload problem on this endpoint is a 400
    let JsonBody(payload) = body.map_err(|e| match e {
        AppError::Validation(errors) => AppError::InvalidInput(errors),
        other => other,
    })?;
    let author = state.services.authors.create(payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Get an author with its books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "The author has been retrieved", body = AuthorDetail),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    PathId(id, _): PathId<Author>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get_detail(id).await?;
    Ok(Json(author))
}

/// Replace an author's names
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 200, description = "The author has been updated", body = Author),
        (status = 400, description = "No input data provided", body = ErrorResponse),
        (status = 404, description = "Author not found", body = ErrorResponse),
        (status = 422, description = "The author could not be updated", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    PathId(id, _): PathId<Author>,
    JsonBody(payload): JsonBody<AuthorPayload>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.update(id, payload).await?;
    Ok(Json(author))
}

/// Delete an author together with its books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "The author has been deleted"),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    PathId(id, _): PathId<Author>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
