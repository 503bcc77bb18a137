//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Author record as stored in the `authors` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub author_id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

/// Author with the books referencing it (detail view)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    pub author_id: i64,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub books: Vec<Book>,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        Self {
            author_id: author.author_id,
            first_name: author.first_name,
            middle_name: author.middle_name,
            last_name: author.last_name,
            books,
        }
    }
}

/// Author request payload, standalone or nested in a book payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct AuthorPayload {
    /// Existing author to reuse when updating a book
    pub author_id: Option<i64>,
    #[validate(
        required(message = "Missing data for required field."),
        length(min = 1, message = "First name is required.")
    )]
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    #[validate(
        required(message = "Missing data for required field."),
        length(min = 1, message = "Last name is required.")
    )]
    pub last_name: Option<String>,
}

/// Validated author data, ready for storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorInput {
    pub author_id: Option<i64>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

impl AuthorInput {
    pub fn new(first_name: impl Into<String>, middle_name: Option<&str>, last_name: impl Into<String>) -> Self {
        Self {
            author_id: None,
            first_name: first_name.into(),
            middle_name: middle_name.map(str::to_string),
            last_name: last_name.into(),
        }
    }
}
