//! Axum handlers. Admin operations themselves are GraphQL resolvers in
//! [`crate::graphql`]; this module only bridges HTTP to the schema.

pub mod graphql;
