//! GraphQL API for the catalog
//!
//! Queries and mutations live in domain modules under `queries/` and
//! `mutations/`; `schema.rs` merges them into the roots. Nested fields that
//! would query once per parent go through the batching loaders in `loaders`.

pub mod auth;
pub mod loaders;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AuthExt, AuthGuard, AuthUser};
pub use schema::{CatalogSchema, MutationRoot, QueryRoot, build_schema};
