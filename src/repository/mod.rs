//! Repository layer for database operations
//!
//! Every public repository method acquires one pooled connection, runs its
//! statements on it and hands it back when the guard drops. Statement helpers
//! take a `&mut SqliteConnection` so the same SQL can run either on such a
//! connection or inside a transaction.

pub mod authors;
pub mod books;
pub mod schema;

use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Pool, Sqlite, Transaction,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Database connection pool
pub type DbPool = Pool<Sqlite>;

/// Open the SQLite pool described by `config`.
///
/// Foreign keys are switched on for every connection so that deleting an
/// author cascades to its books.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let mut options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms));

    let pool_options = if config.is_in_memory() {
        // Each in-memory connection is its own database
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!("SQLite pool created for {}", config.url);
    Ok(pool)
}

pub(crate) async fn begin_write(pool: &DbPool) -> AppResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: DbPool,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create both tables unless they already exist.
    ///
    /// Returns `true` when the schema was created by this call.
    pub async fn create_schema_if_absent(&self) -> AppResult<bool> {
        schema::create_schema_if_absent(&self.pool).await
    }

    /// Start a transaction for a read-then-write workflow.
    ///
    /// The write lock is taken up front with `BEGIN IMMEDIATE`. A deferred
    /// transaction whose read snapshot goes stale cannot upgrade to a writer
    /// and fails with `SQLITE_BUSY` without waiting on the busy timeout.
    pub async fn begin_write(&self) -> AppResult<Transaction<'static, Sqlite>> {
        begin_write(&self.pool).await
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
