use super::prelude::*;

#[derive(Default)]
pub struct UserMutations;

#[Object]
impl UserMutations {
    /// Register a new user. No authentication required.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        username: String,
        favourite_genre: String,
    ) -> Result<Option<User>> {
        let db = ctx.data_unchecked::<Database>();
        let invalid_args = value!({
            "username": username.clone(),
            "favouriteGenre": favourite_genre.clone(),
        });

        let record = db
            .users()
            .create(CreateUser {
                username,
                favourite_genre,
            })
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "User registration failed");
                CatalogError::validation(e, invalid_args).extend()
            })?;

        tracing::info!(user_id = %record.id, username = %record.username, "User registered");
        Ok(Some(record.into()))
    }

    /// Exchange username and password for a session token
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<Option<Token>> {
        let auth = ctx.data_unchecked::<AuthService>();

        match auth.login(&username, &password).await {
            Ok(value) => {
                tracing::info!(username = %username, "User logged in");
                Ok(Some(Token { value }))
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                Err(e.extend())
            }
        }
    }
}
