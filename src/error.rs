//! Domain errors surfaced through the GraphQL API
//!
//! Every variant maps to a GraphQL error carrying an `extensions.code`.
//! Resolvers convert with [ErrorExtensions::extend]; a bare `?` would go
//! through async-graphql's blanket `From<Display>` and drop the code.

use async_graphql::{ErrorExtensions, Value};
use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad credentials or a token that failed verification
    #[error("{0}")]
    Authentication(String),

    /// A protected operation was attempted without a session
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Input rejected by validation or by the store
    #[error("Save failed: {message}")]
    Validation { message: String, invalid_args: Value },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Wrap a failed write, keeping the arguments that caused it
    pub fn validation(err: StoreError, invalid_args: Value) -> Self {
        Self::Validation {
            message: err.to_string(),
            invalid_args,
        }
    }

    /// The `extensions.code` value for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "UNAUTHENTICATED",
            Self::NotAuthenticated => "UNAUTHORIZED",
            Self::Validation { .. } => "BAD_USER_INPUT",
            Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store operation failed");
        Self::Internal(err.to_string())
    }
}

impl ErrorExtensions for CatalogError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.code());
            if let Self::Validation { invalid_args, .. } = self {
                e.set("invalidArgs", invalid_args.clone());
            }
        })
    }
}
