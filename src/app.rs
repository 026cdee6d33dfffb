//! Application state and HTTP router construction.
//!
//! Used by `main` at startup and by the integration tests, which drive
//! the router directly without binding a socket.

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::db::Database;
use crate::graphql::{CatalogSchema, build_schema};
use crate::services::AuthService;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: AuthService,
    pub schema: CatalogSchema,
}

impl AppState {
    /// Wire the schema to an explicitly constructed store and auth service
    pub fn new(db: Database, auth: AuthService) -> Self {
        let schema = build_schema(db.clone(), auth.clone());
        Self { db, auth, schema }
    }
}

/// Build the full Axum router with CORS and request tracing.
/// Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .merge(api::graphql::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
