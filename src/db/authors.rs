//! Authors repository
//!
//! An author's name is its business key, stored trimmed. `book_count` is
//! never stored: it is computed from the books table whenever an author is read.

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::sqlite_helpers::{new_id, now_iso8601};
use super::{MIN_AUTHOR_NAME_LEN, StoreResult, map_write_error, require_min_len};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub id: String,
    pub name: String,
    pub born: Option<i32>,
    /// Number of books referencing this author, when read with the aggregate
    pub book_count: Option<i64>,
}

type AuthorRow = (String, String, Option<i32>, i64);

impl From<AuthorRow> for AuthorRecord {
    fn from((id, name, born, book_count): AuthorRow) -> Self {
        Self {
            id,
            name,
            born,
            book_count: Some(book_count),
        }
    }
}

const SELECT_WITH_COUNT: &str = r#"
    SELECT a.id, a.name, a.born,
           (SELECT COUNT(*) FROM books b WHERE b.author_id = a.id) AS book_count
    FROM authors a
"#;

/// Look up an author by name, inserting it when missing.
///
/// Runs on the caller's connection so it can share a transaction with the
/// insert that needs the author. The UNIQUE constraint on `name` plus
/// `ON CONFLICT DO NOTHING` keeps concurrent callers from creating duplicates.
/// Returns the author and whether this call created it.
pub(crate) async fn find_or_create(
    conn: &mut SqliteConnection,
    name: &str,
) -> StoreResult<(AuthorRecord, bool)> {
    require_min_len("author", name, MIN_AUTHOR_NAME_LEN)?;
    let name = name.trim();

    let inserted = sqlx::query(
        "INSERT INTO authors (id, name, born, created_at) VALUES (?, ?, NULL, ?) ON CONFLICT(name) DO NOTHING",
    )
    .bind(new_id())
    .bind(name)
    .bind(now_iso8601())
    .execute(&mut *conn)
    .await
    .map_err(|e| map_write_error(e, format!("author '{name}'")))?
    .rows_affected()
        > 0;

    let row: AuthorRow = sqlx::query_as(&format!("{SELECT_WITH_COUNT} WHERE a.name = ?"))
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    if inserted {
        tracing::debug!(author = %name, "Created author");
    }

    Ok((row.into(), inserted))
}

pub struct AuthorRepository {
    pool: SqlitePool,
}

impl AuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of authors
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every author with its book count, in creation order
    pub async fn list_with_book_counts(&self) -> StoreResult<Vec<AuthorRecord>> {
        let rows: Vec<AuthorRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.name, a.born, COUNT(b.id) AS book_count
            FROM authors a
            LEFT JOIN books b ON b.author_id = a.id
            GROUP BY a.id
            ORDER BY a.rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AuthorRecord::from).collect())
    }

    /// Get author by exact name
    pub async fn get_by_name(&self, name: &str) -> StoreResult<Option<AuthorRecord>> {
        let row: Option<AuthorRow> = sqlx::query_as(&format!("{SELECT_WITH_COUNT} WHERE a.name = ?"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(AuthorRecord::from))
    }

    /// Number of books per author, for a batch of author ids.
    ///
    /// Every requested id is present in the result; authors without books
    /// map to 0.
    pub async fn count_books_by_author(
        &self,
        author_ids: &[String],
    ) -> StoreResult<HashMap<String, i64>> {
        let mut counts: HashMap<String, i64> =
            author_ids.iter().map(|id| (id.clone(), 0)).collect();
        if author_ids.is_empty() {
            return Ok(counts);
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT author_id, COUNT(*) FROM books WHERE author_id IN (",
        );
        let mut ids = query.separated(", ");
        for id in author_ids {
            ids.push_bind(id.as_str());
        }
        ids.push_unseparated(") GROUP BY author_id");

        let rows: Vec<(String, i64)> = query.build_query_as().fetch_all(&self.pool).await?;
        counts.extend(rows);
        Ok(counts)
    }

    /// Standalone find-or-create, in its own transaction
    #[cfg(test)]
    pub async fn find_or_create(&self, name: &str) -> StoreResult<(AuthorRecord, bool)> {
        let mut tx = self.pool.begin().await?;
        let result = find_or_create(&mut *tx, name).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Set the birth year of the named author.
    ///
    /// Returns `None` when no author has that name; nothing is written then.
    pub async fn set_born(&self, name: &str, born: i32) -> StoreResult<Option<AuthorRecord>> {
        let name = name.trim();
        let updated = sqlx::query("UPDATE authors SET born = ? WHERE name = ?")
            .bind(born)
            .bind(name)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        self.get_by_name(name).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::db::{CreateBook, Database, StoreError};

    #[tokio::test]
    async fn test_find_or_create_reuses_existing_author() {
        let db = Database::in_memory().await.unwrap();
        let authors = db.authors();

        let (first, created) = authors.find_or_create("Robert Martin").await.unwrap();
        assert!(created);
        assert_eq!(first.book_count, Some(0));

        let (second, created) = authors.find_or_create("Robert Martin").await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(authors.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_or_create_rejects_short_name() {
        let db = Database::in_memory().await.unwrap();
        assert_matches!(
            db.authors().find_or_create("Bob").await,
            Err(StoreError::Validation { field: "author", .. })
        );
        assert_eq!(db.authors().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_or_create_ignores_surrounding_whitespace() {
        let db = Database::in_memory().await.unwrap();
        let authors = db.authors();

        let (first, _) = authors.find_or_create("Robert Martin").await.unwrap();
        let (second, created) = authors.find_or_create("  Robert Martin ").await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.name, "Robert Martin");
        assert_eq!(authors.count().await.unwrap(), 1);

        let updated = authors.set_born("Robert Martin ", 1952).await.unwrap();
        assert_eq!(updated.map(|a| a.born), Some(Some(1952)));
    }

    #[tokio::test]
    async fn test_count_books_by_author_batches_ids() {
        let db = Database::in_memory().await.unwrap();
        let books = db.books();
        for (title, author) in [
            ("Clean Code", "Robert Martin"),
            ("Agile software development", "Robert Martin"),
            ("Refactoring, edition 2", "Martin Fowler"),
        ] {
            books
                .create(CreateBook {
                    title: title.to_string(),
                    published: 2000,
                    author: author.to_string(),
                    genres: vec![],
                })
                .await
                .unwrap();
        }
        let (lonely, _) = db.authors().find_or_create("Sandi Metz").await.unwrap();
        let martin = db.authors().get_by_name("Robert Martin").await.unwrap().unwrap();
        let fowler = db.authors().get_by_name("Martin Fowler").await.unwrap().unwrap();

        let counts = db
            .authors()
            .count_books_by_author(&[martin.id.clone(), fowler.id.clone(), lonely.id.clone()])
            .await
            .unwrap();
        assert_eq!(counts.len(), 3);
        assert_eq!(counts[&martin.id], 2);
        assert_eq!(counts[&fowler.id], 1);
        assert_eq!(counts[&lonely.id], 0);

        assert!(db.authors().count_books_by_author(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_born_unknown_author_is_none() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.authors().set_born("Nobody Here", 1950).await.unwrap(), None);
        assert_eq!(db.authors().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_born_updates_author() {
        let db = Database::in_memory().await.unwrap();
        db.authors().find_or_create("Fyodor Dostoevsky").await.unwrap();

        let updated = db
            .authors()
            .set_born("Fyodor Dostoevsky", 1821)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.born, Some(1821));

        let reloaded = db.authors().get_by_name("Fyodor Dostoevsky").await.unwrap().unwrap();
        assert_eq!(reloaded.born, Some(1821));
    }
}
