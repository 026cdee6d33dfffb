//! Library catalog backend
//!
//! A GraphQL API over a small catalog of books, authors and users, with
//! token-based authentication for mutations.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod graphql;
pub mod services;

pub use app::{AppState, build_app};
pub use config::Config;
pub use db::Database;
pub use error::CatalogError;
