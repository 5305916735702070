//! Authentication primitives and the admin login flow.
//!
//! - [`password`] -- Argon2id hashing, legacy bcrypt verification.
//! - [`jwt`] -- session and two-factor challenge tokens.
//! - [`flow`] -- login, second-factor, session validation and logout.

pub mod flow;
pub mod jwt;
pub mod password;
