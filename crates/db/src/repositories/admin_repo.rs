//! Repository for the `admins` table.

use sqlx::{PgExecutor, PgPool};
use ticketdesk_core::types::DbId;

use crate::models::admin::{Admin, CreateAdmin};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, password_hash, email, full_name, is_active, \
                       two_factor_enabled, two_factor_secret, role_id, last_login_at, \
                       created_at, updated_at";

/// Provides lookup and lifecycle operations for admin accounts.
pub struct AdminRepo;

impl AdminRepo {
    /// Insert a new admin, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (username, password_hash, email, full_name, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find an admin by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE username = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Set `last_login_at` to now.
    pub async fn record_login<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE admins SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Set the active flag. Returns `true` if the row changed.
    pub async fn set_active(pool: &PgPool, id: DbId, active: bool) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE admins SET is_active = $2 WHERE id = $1 AND is_active <> $2")
                .bind(id)
                .bind(active)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a hex-encoded TOTP secret and turn on the two-factor flag.
    ///
    /// Returns `true` if the row was updated.
    pub async fn enable_two_factor(
        pool: &PgPool,
        id: DbId,
        secret_hex: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admins SET two_factor_enabled = true, two_factor_secret = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(secret_hex)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Turn off two-factor authentication and clear the stored secret.
    pub async fn disable_two_factor(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admins SET two_factor_enabled = false, two_factor_secret = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record `step` as the last accepted TOTP step.
    ///
    /// Returns `false` when `step` is not newer than the stored one, i.e. the
    /// code was already used.
    pub async fn advance_two_factor_step<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        step: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE admins SET two_factor_last_step = $2
             WHERE id = $1 AND (two_factor_last_step IS NULL OR two_factor_last_step < $2)",
        )
        .bind(id)
        .bind(step)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
