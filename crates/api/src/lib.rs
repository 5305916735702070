//! Ticketdesk admin API server library.
//!
//! Exposes the building blocks (config, state, auth flow, GraphQL schema,
//! router) so integration tests, the server binary and the provisioning CLI
//! share one implementation.

pub mod auth;
pub mod config;
pub mod error;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
