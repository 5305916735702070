//! Domain building blocks shared by the database layer, the API server and
//! the provisioning CLI. Nothing in this crate performs IO.

pub mod audit;
pub mod contact;
pub mod error;
pub mod hashing;
pub mod roles;
pub mod two_factor;
pub mod types;
