use super::prelude::*;

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book, creating its author if the name is new.
    ///
    /// Requires authentication.
    #[graphql(guard = "AuthGuard")]
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        published: i32,
        author: String,
        genres: Vec<String>,
    ) -> Result<Option<Book>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();
        let invalid_args = value!({
            "title": title.clone(),
            "published": published,
            "author": author.clone(),
            "genres": genres.clone(),
        });

        let (record, author_created) = db
            .books()
            .create(CreateBook {
                title,
                published,
                author,
                genres,
            })
            .await
            .map_err(|e| {
                tracing::warn!(user_id = %user.id, error = %e, "Add book failed");
                CatalogError::validation(e, invalid_args).extend()
            })?;

        tracing::info!(
            user_id = %user.id,
            book_id = %record.id,
            author = %record.author.name,
            author_created,
            "User added book: {}",
            record.title
        );

        Ok(Some(record.into()))
    }
}
