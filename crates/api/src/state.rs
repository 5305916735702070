use std::sync::Arc;

use crate::config::ServerConfig;
use crate::graphql::{build_schema, AppSchema};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool and schema are reference-counted internally.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ticketdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Executable GraphQL schema; holds its own handles to the pool and config.
    pub schema: AppSchema,
}

impl AppState {
    pub fn new(pool: ticketdesk_db::DbPool, config: Arc<ServerConfig>) -> Self {
        let schema = build_schema(pool.clone(), Arc::clone(&config));
        Self {
            pool,
            config,
            schema,
        }
    }
}
