//! Database schema and bootstrap data

use crate::{
    config::SeedConfig,
    error::{AppError, AppResult},
    models::AuthorInput,
};

use super::{authors, begin_write, books, DbPool};

const CREATE_AUTHORS: &str = r#"
    CREATE TABLE IF NOT EXISTS authors (
        author_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name VARCHAR(50) NOT NULL,
        middle_name VARCHAR(50),
        last_name VARCHAR(50) NOT NULL
    )
"#;

const CREATE_BOOKS: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author_id INTEGER NOT NULL REFERENCES authors(author_id) ON DELETE CASCADE
    )
"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_books_title ON books(title)",
];

/// Create the `authors` and `books` tables when missing.
///
/// Returns `true` only if neither table existed before the call. A database
/// holding just one of them gets the missing one but reports `false`, so
/// existing rows are never seeded over.
pub async fn create_schema_if_absent(pool: &DbPool) -> AppResult<bool> {
    let mut tx = begin_write(pool).await?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('authors', 'books')",
    )
    .fetch_one(&mut *tx)
    .await?;

    if existing == 2 {
        tracing::debug!("Schema already present");
        return Ok(false);
    }

    sqlx::query(CREATE_AUTHORS).execute(&mut *tx).await?;
    sqlx::query(CREATE_BOOKS).execute(&mut *tx).await?;
    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;
    if existing == 0 {
        tracing::info!("Database schema created");
    } else {
        tracing::warn!("Database schema was incomplete, missing table created");
    }
    Ok(existing == 0)
}

/// Insert the configured sample authors and books in one transaction
pub async fn seed(pool: &DbPool, seed: &SeedConfig) -> AppResult<()> {
    let mut tx = begin_write(pool).await?;

    let mut author_ids = Vec::with_capacity(seed.authors.len());
    for author in &seed.authors {
        let input = AuthorInput::new(
            author.first_name.as_str(),
            author.middle_name.as_deref(),
            author.last_name.as_str(),
        );
        let stored = authors::insert(&mut tx, &input).await?;
        author_ids.push(stored.author_id);
    }

    for book in &seed.books {
        let author_id = book
            .author
            .checked_sub(1)
            .and_then(|index| author_ids.get(index))
            .copied()
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Seed book '{}' references unknown author #{}",
                    book.title, book.author
                ))
            })?;
        books::insert(&mut tx, &book.title, author_id).await?;
    }

    tx.commit().await?;
    tracing::info!(
        "Seeded {} author(s) and {} book(s)",
        seed.authors.len(),
        seed.books.len()
    );
    Ok(())
}
