//! Route definitions for the GraphQL endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::graphql;
use crate::state::AppState;

/// ```text
/// POST /graphql -> graphql_handler
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", post(graphql::graphql_handler))
}
