//! GraphQL over HTTP
//!
//! `POST /graphql` executes operations. The `Authorization` header is resolved
//! to a user before execution; a bearer token that fails verification rejects
//! the whole request. `GET /graphql` serves GraphiQL to browsers.

use async_graphql::http::GraphiQLSource;
use async_graphql::{ErrorExtensions, ServerError};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT, AUTHORIZATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};

use crate::app::AppState;
use crate::graphql::AuthUser;

/// Routes for /graphql, plus `POST /` for clients pointed at the server root
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(graphql_handler))
        .route("/graphql", get(graphiql).post(graphql_handler))
}

/// GraphQL query/mutation handler with auth context
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let authorization = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());

    let current_user = match state.auth.resolve_current_user(authorization).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting request with invalid token");
            let error = e.extend();
            let mut server_error = ServerError::new(error.message, None);
            server_error.extensions = error.extensions;
            return async_graphql::Response::from_errors(vec![server_error]).into();
        }
    };

    let mut request = req.into_inner();
    if let Some(user) = current_user {
        tracing::debug!(user_id = %user.id, "Authenticated request");
        request = request.data(AuthUser::from(user));
    }

    state.schema.execute(request).await.into()
}

/// GraphiQL interactive playground (only for browsers)
async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            axum::Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}
