//! Books service

use sqlx::SqliteConnection;

use crate::{
    error::{AppError, AppResult},
    models::{AuthorInput, Book, BookInput, BookPayload, BookRow},
    repository::{authors, books, Repository},
    validation,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create a book, reusing an author with the same name or creating one.
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let input = validation::validate_book(&self.repository.books, payload, None).await?;
        self.store(input).await
    }

    /// Insert a validated book.
    ///
    /// The author lookup/insert and the book insert share one transaction, so
    /// a failed book insert leaves no new author behind. A title stored since
    /// validation ran is reported as a conflict.
    async fn store(&self, input: BookInput) -> AppResult<Book> {
        let mut tx = self.repository.begin_write().await?;

        if books::fetch_by_title(&mut tx, &input.title).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A book titled '{}' was created concurrently",
                input.title
            )));
        }

        let author_id = find_or_create_author(&mut tx, &input.author).await?;
        let book = books::insert(&mut tx, &input.title, author_id).await?;
        tx.commit().await?;

        tracing::info!("Created book {} '{}' by author {}", book.id, book.title, author_id);
        Ok(book)
    }

    /// Replace a book's title and author.
    ///
    /// The payload author is reused when it carries the ID of an existing
    /// author; otherwise a new author is created from its names.
    pub async fn update(&self, id: i64, payload: BookPayload) -> AppResult<Book> {
        let input = validation::validate_book(&self.repository.books, payload, Some(id)).await?;
        self.get_by_id(id).await?;

        let mut tx = self.repository.begin_write().await?;

        if let Some(other) = books::fetch_by_title(&mut tx, &input.title).await? {
            if other.id != id {
                return Err(AppError::Conflict(format!(
                    "A book titled '{}' was created concurrently",
                    input.title
                )));
            }
        }

        let existing = match input.author.author_id {
            Some(author_id) => authors::fetch_by_id(&mut tx, author_id).await?,
            None => None,
        };
        let author_id = match existing {
            Some(author) => author.author_id,
            None => {
                let created = authors::insert(&mut tx, &input.author).await?;
                tracing::info!("Created author {} while updating book {}", created.author_id, id);
                created.author_id
            }
        };

        let row = BookRow {
            id,
            title: input.title,
            author_id,
        };
        let book = books::update(&mut tx, &row).await?;
        tx.commit().await?;

        tracing::info!("Updated book {}", id);
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get_by_id(id).await?;
        self.repository.books.delete_by_id(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}

/// Resolve the author of a new book by exact name, inserting it when unknown
async fn find_or_create_author(conn: &mut SqliteConnection, author: &AuthorInput) -> AppResult<i64> {
    let existing = authors::fetch_by_name(
        &mut *conn,
        &author.first_name,
        &author.last_name,
        author.middle_name.as_deref().into(),
    )
    .await?;

    match existing {
        Some(found) => {
            tracing::debug!("Reusing author {}", found.author_id);
            Ok(found.author_id)
        }
        None => {
            let created = authors::insert(conn, author).await?;
            tracing::info!(
                "Created author {} {} ({})",
                created.first_name,
                created.last_name,
                created.author_id
            );
            Ok(created.author_id)
        }
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Book {} doesn't exist", id))
}
