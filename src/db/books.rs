//! Books repository
//!
//! Books reference their author by id. Reads always join the author so
//! callers get a complete book in one round trip.

use sqlx::SqlitePool;

use super::authors::{AuthorRecord, find_or_create};
use super::sqlite_helpers::{json_to_vec, new_id, now_iso8601, vec_to_json};
use super::{MIN_TITLE_LEN, StoreResult, map_write_error, require_min_len};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub published: i32,
    pub genres: Vec<String>,
    pub author: AuthorRecord,
}

type BookRow = (String, String, i32, String, String, String, Option<i32>);

impl From<BookRow> for BookRecord {
    fn from((id, title, published, genres, author_id, author_name, author_born): BookRow) -> Self {
        Self {
            id,
            title,
            published,
            genres: json_to_vec(&genres),
            author: AuthorRecord {
                id: author_id,
                name: author_name,
                born: author_born,
                book_count: None,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBook {
    pub title: String,
    pub published: i32,
    /// Author name; the author is created if it does not exist yet
    pub author: String,
    pub genres: Vec<String>,
}

/// Optional predicates for [BookRepository::list]. Both may be combined.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Exact author name
    pub author: Option<String>,
    /// Exact member of the book's genre list
    pub genre: Option<String>,
}

pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Total number of books
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Books matching every predicate set in `filter`, in creation order
    pub async fn list(&self, filter: &BookFilter) -> StoreResult<Vec<BookRecord>> {
        let author = filter.author.as_deref();
        let genre = filter.genre.as_deref();

        let rows: Vec<BookRow> = sqlx::query_as(
            r#"
            SELECT b.id, b.title, b.published, b.genres, a.id, a.name, a.born
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE (? IS NULL OR a.name = ?)
              AND (? IS NULL OR EXISTS (
                    SELECT 1 FROM json_each(b.genres) g WHERE g.value = ?
                  ))
            ORDER BY b.rowid
            "#,
        )
        .bind(author)
        .bind(author)
        .bind(genre)
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BookRecord::from).collect())
    }

    /// Insert a book, creating its author first when needed.
    ///
    /// Author lookup/creation and the book insert share one transaction, so a
    /// rejected book never leaves a freshly created author behind.
    /// Returns the stored book and whether its author was created.
    pub async fn create(&self, book: CreateBook) -> StoreResult<(BookRecord, bool)> {
        require_min_len("title", &book.title, MIN_TITLE_LEN)?;
        let title = book.title.trim().to_string();

        let mut tx = self.pool.begin().await?;
        let (author, author_created) = find_or_create(&mut *tx, &book.author).await?;

        let id = new_id();
        sqlx::query(
            r#"
            INSERT INTO books (id, title, published, author_id, genres, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&title)
        .bind(book.published)
        .bind(&author.id)
        .bind(vec_to_json(&book.genres))
        .bind(now_iso8601())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, format!("book '{title}'")))?;

        tx.commit().await?;

        let record = BookRecord {
            id,
            title,
            published: book.published,
            genres: book.genres,
            author: AuthorRecord {
                book_count: author.book_count.map(|n| n + 1),
                ..author
            },
        };
        Ok((record, author_created))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::db::{Database, StoreError};

    fn book(title: &str, author: &str, genres: &[&str]) -> CreateBook {
        CreateBook {
            title: title.to_string(),
            published: 2000,
            author: author.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    async fn seeded() -> Database {
        let db = Database::in_memory().await.unwrap();
        let books = db.books();
        books.create(book("Clean Code", "Robert Martin", &["refactoring"])).await.unwrap();
        books
            .create(book("Agile software development", "Robert Martin", &["agile", "patterns", "design"]))
            .await
            .unwrap();
        books
            .create(book("Refactoring, edition 2", "Martin Fowler", &["refactoring"]))
            .await
            .unwrap();
        books
            .create(book("Crime and punishment", "Fyodor Dostoevsky", &["classic", "crime"]))
            .await
            .unwrap();
        db
    }

    fn titles(books: &[BookRecord]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_without_filter_returns_all_in_order() {
        let db = seeded().await;
        let all = db.books().list(&BookFilter::default()).await.unwrap();
        assert_eq!(
            titles(&all),
            vec![
                "Clean Code",
                "Agile software development",
                "Refactoring, edition 2",
                "Crime and punishment"
            ]
        );
        assert_eq!(all[3].author.name, "Fyodor Dostoevsky");
        assert_eq!(all[1].genres, vec!["agile", "patterns", "design"]);
    }

    #[tokio::test]
    async fn test_list_by_author() {
        let db = seeded().await;
        let filter = BookFilter {
            author: Some("Robert Martin".to_string()),
            genre: None,
        };
        let found = db.books().list(&filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Clean Code", "Agile software development"]);
        assert!(found.iter().all(|b| b.author.name == "Robert Martin"));
    }

    #[tokio::test]
    async fn test_list_by_genre_is_exact_membership() {
        let db = seeded().await;
        let filter = BookFilter {
            author: None,
            genre: Some("refactoring".to_string()),
        };
        let found = db.books().list(&filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Clean Code", "Refactoring, edition 2"]);

        let partial = BookFilter {
            author: None,
            genre: Some("refactor".to_string()),
        };
        assert!(db.books().list(&partial).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_author_and_genre_intersects() {
        let db = seeded().await;
        let filter = BookFilter {
            author: Some("Robert Martin".to_string()),
            genre: Some("refactoring".to_string()),
        };
        let found = db.books().list(&filter).await.unwrap();
        assert_eq!(titles(&found), vec!["Clean Code"]);
    }

    #[tokio::test]
    async fn test_list_unknown_author_is_empty() {
        let db = seeded().await;
        let filter = BookFilter {
            author: Some("Nobody Known".to_string()),
            genre: None,
        };
        assert!(db.books().list(&filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_novel_author_creates_one_author() {
        let db = Database::in_memory().await.unwrap();
        let (created, author_created) = db
            .books()
            .create(book("The Demon", "Some New Writer", &["horror"]))
            .await
            .unwrap();

        assert!(author_created);
        assert_eq!(created.author.name, "Some New Writer");
        assert_eq!(created.author.book_count, Some(1));
        assert_eq!(db.authors().count().await.unwrap(), 1);
        assert_eq!(db.books().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_title_rolls_back_new_author() {
        let db = seeded().await;
        let result = db.books().create(book("Clean Code", "Another Person", &[])).await;

        assert_matches!(result, Err(StoreError::Conflict(_)));
        assert!(db.authors().get_by_name("Another Person").await.unwrap().is_none());
        assert_eq!(db.books().count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_create_stores_trimmed_title_and_author() {
        let db = seeded().await;
        let (created, author_created) = db
            .books()
            .create(book("  The Clean Coder ", "Robert Martin  ", &[]))
            .await
            .unwrap();

        assert!(!author_created);
        assert_eq!(created.title, "The Clean Coder");
        assert_eq!(created.author.name, "Robert Martin");
        assert_eq!(created.author.book_count, Some(3));
        assert_eq!(db.authors().count().await.unwrap(), 3);

        let padded_duplicate = db.books().create(book(" Clean Code ", "Robert Martin", &[])).await;
        assert_matches!(padded_duplicate, Err(StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_short_title_is_rejected_before_write() {
        let db = Database::in_memory().await.unwrap();
        let result = db.books().create(book(" ", "Robert Martin", &[])).await;

        assert_matches!(result, Err(StoreError::Validation { field: "title", .. }));
        assert_eq!(db.authors().count().await.unwrap(), 0);
    }
}
