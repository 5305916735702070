//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Writes that take part in the login
//! transaction accept any `PgExecutor` so they can run on `&mut *tx`.

pub mod activity_repo;
pub mod admin_repo;
pub mod role_repo;
pub mod session_repo;
pub mod two_factor_challenge_repo;

pub use activity_repo::ActivityRepo;
pub use admin_repo::AdminRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use two_factor_challenge_repo::TwoFactorChallengeRepo;
