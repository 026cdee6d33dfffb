//! Database connection and repositories
//!
//! The catalog keeps three collections (authors, books, users) in SQLite.
//! A [Database] handle is constructed once at startup and passed to whoever
//! needs it; repositories are cheap views over the shared pool.

pub mod authors;
pub mod books;
pub mod schema_sync;
pub mod seed;
pub mod sqlite_helpers;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub use authors::{AuthorRecord, AuthorRepository};
pub use books::{BookFilter, BookRecord, BookRepository, CreateBook};
pub use users::{CreateUser, UserRecord, UsersRepository};

/// Minimum trimmed length of a book title
pub const MIN_TITLE_LEN: usize = 2;
/// Minimum trimmed length of an author name
pub const MIN_AUTHOR_NAME_LEN: usize = 4;
/// Minimum trimmed length of a username
pub const MIN_USERNAME_LEN: usize = 3;

/// Errors raised by the repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// A field failed a document-level rule before reaching the database
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A unique key already exists
    #[error("{0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Reject values shorter than `min` characters once trimmed
pub(crate) fn require_min_len(field: &'static str, value: &str, min: usize) -> StoreResult<()> {
    if value.trim().chars().count() < min {
        return Err(StoreError::Validation {
            field,
            message: format!("must be at least {min} characters long"),
        });
    }
    Ok(())
}

/// Turn a unique-constraint failure into [StoreError::Conflict]
pub(crate) fn map_write_error(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(what.into())
        }
        _ => StoreError::Database(err),
    }
}

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection pool and make sure the schema exists
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        if let Some(dir) = options
            .get_filename()
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(dir).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory store, used by tests and throwaway runs.
    ///
    /// An in-memory SQLite database lives and dies with its connection, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get an authors repository
    pub fn authors(&self) -> AuthorRepository {
        AuthorRepository::new(self.pool.clone())
    }

    /// Get a books repository
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Get a users repository
    pub fn users(&self) -> UsersRepository {
        UsersRepository::new(self.pool.clone())
    }

    /// Create missing tables and indexes
    pub async fn migrate(&self) -> StoreResult<()> {
        schema_sync::sync_schema(&self.pool).await?;
        Ok(())
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
