//! Repository for the `admin_two_factor_challenges` table.

use sqlx::{PgExecutor, PgPool};
use ticketdesk_core::types::DbId;

use crate::models::two_factor_challenge::{CreateTwoFactorChallenge, TwoFactorChallenge};

const COLUMNS: &str = "id, admin_id, jti, failed_attempts, expires_at, consumed_at, created_at";

/// Tracks issued two-factor challenges so each one is single-use and
/// tolerates a bounded number of wrong codes.
pub struct TwoFactorChallengeRepo;

impl TwoFactorChallengeRepo {
    /// Record a freshly issued challenge.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateTwoFactorChallenge,
    ) -> Result<TwoFactorChallenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_two_factor_challenges (admin_id, jti, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TwoFactorChallenge>(&query)
            .bind(input.admin_id)
            .bind(&input.jti)
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Find a challenge that can still be answered: not consumed, not
    /// expired, and with fewer than `max_attempts` wrong codes.
    pub async fn find_open_by_jti(
        pool: &PgPool,
        jti: &str,
        max_attempts: i32,
    ) -> Result<Option<TwoFactorChallenge>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_two_factor_challenges
             WHERE jti = $1
               AND consumed_at IS NULL
               AND expires_at > NOW()
               AND failed_attempts < $2"
        );
        sqlx::query_as::<_, TwoFactorChallenge>(&query)
            .bind(jti)
            .bind(max_attempts)
            .fetch_optional(pool)
            .await
    }

    /// Count one wrong code against a challenge.
    pub async fn record_failure(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_two_factor_challenges SET failed_attempts = failed_attempts + 1
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a challenge as used.
    ///
    /// Returns `false` if it was already consumed, has expired, or ran out of
    /// attempts in the meantime; only one caller can ever get `true`.
    pub async fn consume<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        max_attempts: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admin_two_factor_challenges SET consumed_at = NOW()
             WHERE id = $1
               AND consumed_at IS NULL
               AND expires_at > NOW()
               AND failed_attempts < $2",
        )
        .bind(id)
        .bind(max_attempts)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired or consumed challenges. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM admin_two_factor_challenges
             WHERE expires_at <= NOW() OR consumed_at IS NOT NULL",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
