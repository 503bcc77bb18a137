//! Books repository

use sqlx::SqliteConnection;

use super::{authors, DbPool};
use crate::{
    error::AppResult,
    models::{Book, BookRow},
};

/// Attach the author to a raw book row, falling back to the placeholder
async fn resolve(conn: &mut SqliteConnection, row: BookRow) -> AppResult<Book> {
    let author = authors::fetch_by_id(&mut *conn, row.author_id).await?;
    if author.is_none() {
        tracing::warn!("Book {} references missing author {}", row.id, row.author_id);
    }
    Ok(Book::from_row(row, author))
}

async fn resolve_all(conn: &mut SqliteConnection, rows: Vec<BookRow>) -> AppResult<Vec<Book>> {
    let mut books = Vec::with_capacity(rows.len());
    for row in rows {
        books.push(resolve(&mut *conn, row).await?);
    }
    Ok(books)
}

pub(crate) async fn fetch_by_title(conn: &mut SqliteConnection, title: &str) -> AppResult<Option<BookRow>> {
    let row = sqlx::query_as::<_, BookRow>(
        "SELECT id, title, author_id FROM books WHERE title = ? ORDER BY id LIMIT 1",
    )
    .bind(title)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

pub(crate) async fn insert(conn: &mut SqliteConnection, title: &str, author_id: i64) -> AppResult<Book> {
    let row = sqlx::query_as::<_, BookRow>(
        "INSERT INTO books (title, author_id) VALUES (?, ?) RETURNING id, title, author_id",
    )
    .bind(title)
    .bind(author_id)
    .fetch_one(&mut *conn)
    .await?;
    resolve(conn, row).await
}

pub(crate) async fn update(conn: &mut SqliteConnection, row: &BookRow) -> AppResult<Book> {
    let result = sqlx::query("UPDATE books SET title = ?, author_id = ? WHERE id = ?")
        .bind(&row.title)
        .bind(row.author_id)
        .bind(row.id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        tracing::debug!("Update skipped, book {} does not exist", row.id);
    }
    resolve(conn, row.clone()).await
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: DbPool,
}

impl BooksRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all books with their authors
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, BookRow>("SELECT id, title, author_id FROM books ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        resolve_all(&mut conn, rows).await
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query_as::<_, BookRow>("SELECT id, title, author_id FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Some(resolve(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    /// Get book by exact title
    pub async fn get_by_title(&self, title: &str) -> AppResult<Option<Book>> {
        let mut conn = self.pool.acquire().await?;
        match fetch_by_title(&mut conn, title).await? {
            Some(row) => Ok(Some(resolve(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    /// List the books written by an author
    pub async fn get_by_author_id(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, BookRow>(
            "SELECT id, title, author_id FROM books WHERE author_id = ? ORDER BY id",
        )
        .bind(author_id)
        .fetch_all(&mut *conn)
        .await?;
        resolve_all(&mut conn, rows).await
    }

    /// Insert a book for an existing author
    pub async fn insert(&self, title: &str, author_id: i64) -> AppResult<Book> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, title, author_id).await
    }

    /// Replace a book's title and author. Does nothing if the ID is unknown.
    pub async fn update_by_id(&self, row: &BookRow) -> AppResult<Book> {
        let mut conn = self.pool.acquire().await?;
        update(&mut conn, row).await
    }

    /// Delete a book. Does nothing if the ID is unknown.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete skipped, book {} does not exist", id);
        }
        Ok(())
    }
}
