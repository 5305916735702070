pub mod graphql;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes. Mounted at the root so `/graphql` matches the path the
/// admin panel already calls.
///
/// ```text
/// POST /graphql -> GraphQL endpoint
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(graphql::router())
}
