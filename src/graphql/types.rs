//! GraphQL object types
//!
//! Field names follow the catalog's wire contract; async-graphql renders
//! snake_case Rust names as camelCase (`favourite_genre` → `favouriteGenre`).

use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, ErrorExtensions, ID, Result, SimpleObject};

use crate::db::{AuthorRecord, BookRecord, UserRecord};
use crate::error::CatalogError;

use super::auth::AuthUser;
use super::loaders::BookCountLoader;

/// Convert a stored count to a GraphQL `Int`, refusing values that do not fit
pub(crate) fn graphql_int(count: i64) -> Result<i32> {
    i32::try_from(count).map_err(|_| {
        CatalogError::Internal(format!("count {count} exceeds the GraphQL Int range")).extend()
    })
}

/// A book in the catalog
#[derive(Debug, Clone, SimpleObject)]
pub struct Book {
    pub title: String,
    /// Publication year
    pub published: i32,
    pub author: Author,
    pub genres: Vec<String>,
    pub id: ID,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            title: r.title,
            published: r.published,
            author: r.author.into(),
            genres: r.genres,
            id: ID(r.id),
        }
    }
}

/// An author; `bookCount` is computed on every read
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub name: String,
    /// Birth year, if known
    pub born: Option<i32>,
    pub id: ID,
    /// Count already loaded alongside the author, if any
    #[graphql(skip)]
    pub loaded_book_count: Option<i64>,
}

#[ComplexObject]
impl Author {
    /// Number of books referencing this author
    async fn book_count(&self, ctx: &Context<'_>) -> Result<Option<i32>> {
        let count = match self.loaded_book_count {
            Some(count) => count,
            None => ctx
                .data_unchecked::<DataLoader<BookCountLoader>>()
                .load_one(self.id.0.clone())
                .await
                .map_err(|e| {
                    tracing::error!(author_id = %self.id.0, error = %e, "Book count failed");
                    CatalogError::Internal(e.to_string()).extend()
                })?
                .unwrap_or(0),
        };
        Ok(Some(graphql_int(count)?))
    }
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            name: r.name,
            born: r.born,
            id: ID(r.id),
            loaded_book_count: r.book_count,
        }
    }
}

/// A registered user
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub username: String,
    pub favourite_genre: String,
    pub id: ID,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            username: r.username,
            favourite_genre: r.favourite_genre,
            id: ID(r.id),
        }
    }
}

impl From<&AuthUser> for User {
    fn from(u: &AuthUser) -> Self {
        Self {
            username: u.username.clone(),
            favourite_genre: u.favourite_genre.clone(),
            id: ID(u.id.clone()),
        }
    }
}

/// Signed session token returned by `login`
#[derive(Debug, Clone, SimpleObject)]
pub struct Token {
    pub value: String,
}
