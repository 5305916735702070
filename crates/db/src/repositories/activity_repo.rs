//! Repository for the append-only `admin_activity_log` table.

use sqlx::{PgExecutor, PgPool};
use ticketdesk_core::audit::sanitize_details;
use ticketdesk_core::types::DbId;

use crate::models::activity::{ActivityEntry, CreateActivity};

const COLUMNS: &str = "id, admin_id, action_type, resource_type, details, ip_address, created_at";

/// Default page size for [`ActivityRepo::list_for_admin`].
pub const DEFAULT_LIST_LIMIT: i64 = 50;

pub struct ActivityRepo;

impl ActivityRepo {
    /// Append an entry. Details are sanitised before they are written.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateActivity,
    ) -> Result<ActivityEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_activity_log (admin_id, action_type, resource_type, details, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(input.admin_id)
            .bind(&input.action_type)
            .bind(&input.resource_type)
            .bind(input.details.as_deref().map(sanitize_details))
            .bind(&input.ip_address)
            .fetch_one(executor)
            .await
    }

    /// Most recent entries for an admin, newest first.
    pub async fn list_for_admin(
        pool: &PgPool,
        admin_id: DbId,
        limit: Option<i64>,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM admin_activity_log
             WHERE admin_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(admin_id)
            .bind(limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500))
            .fetch_all(pool)
            .await
    }
}
