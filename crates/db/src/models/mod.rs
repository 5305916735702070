//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row and, where rows are inserted from Rust, a create DTO.

pub mod activity;
pub mod admin;
pub mod role;
pub mod session;
pub mod two_factor_challenge;
