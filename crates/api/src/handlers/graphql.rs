//! Handler for the `/graphql` endpoint.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;

use crate::middleware::auth::ClientInfo;
use crate::state::AppState;

/// POST /graphql
///
/// Executes a GraphQL request with the caller's [`ClientInfo`] attached.
pub async fn graphql_handler(
    State(state): State<AppState>,
    client: ClientInfo,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let request = request.into_inner().data(client);
    state.schema.execute(request).await.into()
}
