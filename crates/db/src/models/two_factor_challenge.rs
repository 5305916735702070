//! Two-factor login challenge model and DTO.

use sqlx::FromRow;
use ticketdesk_core::types::{DbId, Timestamp};

/// A row from `admin_two_factor_challenges`, keyed by the challenge JWT's `jti`.
#[derive(Debug, Clone, FromRow)]
pub struct TwoFactorChallenge {
    pub id: DbId,
    pub admin_id: DbId,
    pub jti: String,
    pub failed_attempts: i32,
    pub expires_at: Timestamp,
    /// Set once the challenge has been exchanged for a session.
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for recording an issued challenge.
pub struct CreateTwoFactorChallenge {
    pub admin_id: DbId,
    pub jti: String,
    pub expires_at: Timestamp,
}
