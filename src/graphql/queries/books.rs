use super::prelude::*;

#[derive(Default)]
pub struct BookQueries;

#[Object]
impl BookQueries {
    /// Total number of books
    async fn book_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let db = ctx.data_unchecked::<Database>();
        let count = db
            .books()
            .count()
            .await
            .map_err(|e| CatalogError::from(e).extend())?;
        graphql_int(count)
    }

    /// Books, optionally restricted to one author and/or one genre.
    ///
    /// When both are given only books matching both are returned.
    async fn all_books(
        &self,
        ctx: &Context<'_>,
        author: Option<String>,
        genre: Option<String>,
    ) -> Result<Vec<Book>> {
        let db = ctx.data_unchecked::<Database>();
        let filter = BookFilter { author, genre };

        let records = db
            .books()
            .list(&filter)
            .await
            .map_err(|e| CatalogError::from(e).extend())?;

        tracing::debug!(
            author = ?filter.author,
            genre = ?filter.genre,
            count = records.len(),
            "Listed books"
        );

        Ok(records.into_iter().map(Book::from).collect())
    }
}
