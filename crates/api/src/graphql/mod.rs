//! GraphQL schema for the admin panel.
//!
//! Queries: `adminValidateSession`, `getAdminByUsername`, `me`.
//! Mutations: `adminLogin`, `adminVerifyTwoFactor`, `adminLogout`.
//!
//! Schema data holds the [`DbPool`] and the shared [`ServerConfig`]; each
//! request additionally carries a [`ClientInfo`](crate::middleware::auth::ClientInfo).

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Schema};
use ticketdesk_db::DbPool;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::ClientInfo;

pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Upper bound on selection-set nesting; the admin schema is shallow.
const MAX_QUERY_DEPTH: usize = 8;

/// Build the executable schema with its long-lived data attached.
pub fn build_schema(pool: DbPool, config: Arc<ServerConfig>) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .data(config)
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

/// Fetch the pool and config attached by [`build_schema`].
pub(crate) fn resolver_deps<'a>(
    ctx: &'a Context<'_>,
) -> AppResult<(&'a DbPool, &'a ServerConfig)> {
    let pool = ctx
        .data::<DbPool>()
        .map_err(|e| AppError::InternalError(format!("Schema is missing the pool: {}", e.message)))?;
    let config = ctx
        .data::<Arc<ServerConfig>>()
        .map_err(|e| AppError::InternalError(format!("Schema is missing config: {}", e.message)))?;
    Ok((pool, config.as_ref()))
}

/// Client metadata for the current request; empty when executed without one
/// (e.g. directly against the schema in tests).
pub(crate) fn client_info(ctx: &Context<'_>) -> ClientInfo {
    ctx.data_opt::<ClientInfo>().cloned().unwrap_or_default()
}
