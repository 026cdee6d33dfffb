//! Schema creation for the catalog collections
//!
//! Tables are created on startup when missing. There is no migration
//! history: column renames or type changes require wiping the database.

use sqlx::SqlitePool;
use tracing::debug;

/// Static table definitions, applied in order
const SCHEMA: &[(&str, &str)] = &[
    (
        "authors",
        r#"
        CREATE TABLE IF NOT EXISTS authors (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL UNIQUE,
            born INTEGER,
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "books",
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL UNIQUE,
            published INTEGER NOT NULL,
            author_id TEXT NOT NULL REFERENCES authors(id),
            genres TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "idx_books_author_id",
        "CREATE INDEX IF NOT EXISTS idx_books_author_id ON books(author_id)",
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            username TEXT NOT NULL UNIQUE,
            favourite_genre TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    ),
];

/// Create every missing table and index
pub async fn sync_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for (name, sql) in SCHEMA {
        debug!(object = name, "Ensuring schema object");
        sqlx::query(sql).execute(pool).await?;
    }
    Ok(())
}
