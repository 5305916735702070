//! Repository for the `admin_sessions` table.

use sqlx::{PgExecutor, PgPool};
use ticketdesk_core::types::DbId;

use crate::models::session::{AdminSession, CreateSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, admin_id, token_hash, is_valid, expires_at, \
                       user_agent, ip_address, created_at, updated_at";

/// Provides CRUD operations for admin sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateSession,
    ) -> Result<AdminSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_sessions (admin_id, token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(input.admin_id)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .bind(&input.user_agent)
            .bind(&input.ip_address)
            .fetch_one(executor)
            .await
    }

    /// Find a live session by its token hash.
    ///
    /// Only returns sessions that are still valid and not expired.
    pub async fn find_active_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<AdminSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_sessions
             WHERE token_hash = $1
               AND is_valid = true
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, AdminSession>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Invalidate the session with the given token hash.
    ///
    /// Returns the admin the session belonged to if a live row was changed.
    pub async fn invalidate_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE admin_sessions SET is_valid = false
             WHERE token_hash = $1 AND is_valid = true
             RETURNING admin_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(admin_id,)| admin_id))
    }

    /// Invalidate all live sessions for an admin. Returns the count changed.
    pub async fn invalidate_all_for_admin(
        pool: &PgPool,
        admin_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admin_sessions SET is_valid = false
             WHERE admin_id = $1 AND is_valid = true",
        )
        .bind(admin_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired or invalidated sessions. Returns the count of deleted rows.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM admin_sessions WHERE expires_at < NOW() OR is_valid = false")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
