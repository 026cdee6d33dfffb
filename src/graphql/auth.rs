//! GraphQL authentication and authorization
//!
//! The HTTP handler resolves the caller and, when there is one, inserts an
//! [AuthUser] into the request data. Resolvers read it through [AuthExt].
//!
//! ## Guards
//!
//! Use `AuthGuard` to require authentication on any GraphQL operation:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn protected_mutation(&self, ctx: &Context<'_>) -> Result<String> { ... }
//! ```

use async_graphql::{Context, ErrorExtensions, Result};

use crate::db::UserRecord;
use crate::error::CatalogError;

/// The user making the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub favourite_genre: String,
}

impl From<UserRecord> for AuthUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            favourite_genre: user.favourite_genre,
        }
    }
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or a `NotAuthenticated` error
    fn auth_user(&self) -> Result<&AuthUser>;

    /// Get the authenticated user if present
    fn try_auth_user(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>()
            .ok_or_else(|| CatalogError::NotAuthenticated.extend())
    }

    fn try_auth_user(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}

/// Guard that requires authentication for GraphQL operations.
///
/// Rejected calls never reach the resolver body, so nothing is written.
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().map(|_| ());
        if result.is_err() {
            tracing::debug!(field = %ctx.field().name(), "Rejected unauthenticated call");
        }
        async move { result }
    }
}
