//! Request extractors.
//!
//! - [`auth::ClientInfo`] -- bearer token and client metadata for the
//!   GraphQL request context.

pub mod auth;
