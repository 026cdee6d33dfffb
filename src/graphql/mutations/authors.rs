use super::prelude::*;

#[derive(Default)]
pub struct AuthorMutations;

#[Object]
impl AuthorMutations {
    /// Set an author's birth year. Returns null if no author has that name.
    ///
    /// Requires authentication.
    #[graphql(guard = "AuthGuard")]
    async fn edit_author(
        &self,
        ctx: &Context<'_>,
        name: String,
        set_born_to: i32,
    ) -> Result<Option<Author>> {
        let user = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .authors()
            .set_born(&name, set_born_to)
            .await
            .map_err(|e| CatalogError::from(e).extend())?;

        match &updated {
            Some(author) => tracing::info!(
                user_id = %user.id,
                author_id = %author.id,
                born = set_born_to,
                "User updated author: {}",
                author.name
            ),
            None => tracing::debug!(author = %name, "Edit skipped, author not found"),
        }

        Ok(updated.map(Author::from))
    }
}
