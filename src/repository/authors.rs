//! Authors repository

use sqlx::SqliteConnection;

use super::DbPool;
use crate::{
    error::AppResult,
    models::{Author, AuthorInput},
};

const AUTHOR_COLUMNS: &str = "author_id, first_name, middle_name, last_name";

/// How the middle name takes part in a name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddleName<'a> {
    /// Not supplied: any middle name matches
    Any,
    /// Supplied but empty or whitespace: matches NULL or blank middle names
    Blank,
    /// Must match exactly
    Exact(&'a str),
}

impl<'a> From<Option<&'a str>> for MiddleName<'a> {
    fn from(value: Option<&'a str>) -> Self {
        match value {
            None => MiddleName::Any,
            Some(s) if s.trim().is_empty() => MiddleName::Blank,
            Some(s) => MiddleName::Exact(s),
        }
    }
}

pub(crate) async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Author>> {
    let author = sqlx::query_as::<_, Author>(&format!(
        "SELECT {} FROM authors WHERE author_id = ?",
        AUTHOR_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(author)
}

pub(crate) async fn fetch_by_name(
    conn: &mut SqliteConnection,
    first_name: &str,
    last_name: &str,
    middle_name: MiddleName<'_>,
) -> AppResult<Option<Author>> {
    let middle_clause = match middle_name {
        MiddleName::Any => "",
        MiddleName::Blank => " AND (middle_name IS NULL OR TRIM(middle_name) = '')",
        MiddleName::Exact(_) => " AND middle_name = ?",
    };
    let sql = format!(
        "SELECT {} FROM authors WHERE first_name = ? AND last_name = ?{} ORDER BY author_id LIMIT 1",
        AUTHOR_COLUMNS, middle_clause
    );

    let mut query = sqlx::query_as::<_, Author>(&sql).bind(first_name).bind(last_name);
    if let MiddleName::Exact(middle) = middle_name {
        query = query.bind(middle);
    }

    Ok(query.fetch_optional(&mut *conn).await?)
}

pub(crate) async fn insert(conn: &mut SqliteConnection, author: &AuthorInput) -> AppResult<Author> {
    let row = sqlx::query_as::<_, Author>(&format!(
        r#"
        INSERT INTO authors (first_name, middle_name, last_name)
        VALUES (?, ?, ?)
        RETURNING {}
        "#,
        AUTHOR_COLUMNS
    ))
    .bind(&author.first_name)
    .bind(&author.middle_name)
    .bind(&author.last_name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(row)
}

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: DbPool,
}

impl AuthorsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all authors
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY author_id",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Author>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_id(&mut conn, id).await
    }

    /// Find the first author whose name matches exactly
    pub async fn get_by_name(
        &self,
        first_name: &str,
        last_name: &str,
        middle_name: Option<&str>,
    ) -> AppResult<Option<Author>> {
        let mut conn = self.pool.acquire().await?;
        fetch_by_name(&mut conn, first_name, last_name, middle_name.into()).await
    }

    /// Insert an author, returning it with its new ID
    pub async fn insert(&self, author: &AuthorInput) -> AppResult<Author> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, author).await
    }

    /// Replace an author's names. Does nothing if the ID is unknown.
    pub async fn update_by_id(&self, author: &Author) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE authors
            SET first_name = ?, middle_name = ?, last_name = ?
            WHERE author_id = ?
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.middle_name)
        .bind(&author.last_name)
        .bind(author.author_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Update skipped, author {} does not exist", author.author_id);
        }
        Ok(())
    }

    /// Delete an author and, through the foreign key, its books
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE author_id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Delete skipped, author {} does not exist", id);
        }
        Ok(())
    }
}
