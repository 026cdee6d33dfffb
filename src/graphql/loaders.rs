//! GraphQL DataLoaders for batching database queries
//!
//! `allBooks { author { bookCount } }` asks for one count per book. The
//! loader collects the author ids requested in the same tick and answers
//! them with a single grouped query.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dataloader::Loader;

use crate::db::{Database, StoreError};

/// Batches `Author.bookCount` lookups by author id
pub struct BookCountLoader {
    db: Database,
}

impl BookCountLoader {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl Loader<String> for BookCountLoader {
    type Value = i64;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[String]) -> Result<HashMap<String, Self::Value>, Self::Error> {
        tracing::debug!(author_count = keys.len(), "Batch loading book counts");
        self.db
            .authors()
            .count_books_by_author(keys)
            .await
            .map_err(Arc::new)
    }
}
