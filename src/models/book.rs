//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::author::{Author, AuthorInput, AuthorPayload};

/// Placeholder returned in place of an author that no longer resolves
pub const AUTHOR_NOT_FOUND: &str = "Author details not found";

/// Raw row from the `books` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
}

/// Author reference of a book, expanded when the author row exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BookAuthor {
    Details(Author),
    Missing(String),
}

impl BookAuthor {
    pub fn missing() -> Self {
        BookAuthor::Missing(AUTHOR_NOT_FOUND.to_string())
    }

    pub fn details(&self) -> Option<&Author> {
        match self {
            BookAuthor::Details(author) => Some(author),
            BookAuthor::Missing(_) => None,
        }
    }
}

/// Book with its author resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Full author record, or "Author details not found"
    #[schema(value_type = Object)]
    pub author: BookAuthor,
}

impl Book {
    /// Build a book from its row and the author looked up for it
    pub fn from_row(row: BookRow, author: Option<Author>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            author: author.map(BookAuthor::Details).unwrap_or_else(BookAuthor::missing),
        }
    }
}

/// Book request payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[validate(required(message = "Missing data for required field."))]
    pub title: Option<String>,
    pub author: Option<AuthorPayload>,
}

/// Validated book data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub author: AuthorInput,
}

/// Response body for a created book
#[derive(Debug, Serialize, ToSchema)]
pub struct BookCreated {
    pub message: String,
    pub book: Book,
}

impl From<Book> for BookCreated {
    fn from(book: Book) -> Self {
        Self {
            message: "Book created".to_string(),
            book,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> BookRow {
        BookRow {
            id: 3,
            title: "War and Peace".into(),
            author_id: 9,
        }
    }

    #[test]
    fn test_from_row_expands_author() {
        let author = Author {
            author_id: 9,
            first_name: "Lev".into(),
            middle_name: Some("Nikolaevich".into()),
            last_name: "Tolstoi".into(),
        };
        let book = Book::from_row(row(), Some(author.clone()));
        assert_eq!(book.author.details(), Some(&author));

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["author"]["last_name"], "Tolstoi");
        assert_eq!(json["author"]["author_id"], 9);
    }

    #[test]
    fn test_from_row_without_author_uses_placeholder() {
        let book = Book::from_row(row(), None);
        assert_eq!(book.author, BookAuthor::missing());

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["author"], AUTHOR_NOT_FOUND);
    }
}
