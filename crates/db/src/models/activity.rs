//! Admin activity log model. Rows are immutable once written.

use sqlx::FromRow;
use ticketdesk_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntry {
    pub id: DbId,
    pub admin_id: DbId,
    pub action_type: String,
    pub resource_type: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending an activity entry.
#[derive(Debug, Clone)]
pub struct CreateActivity {
    pub admin_id: DbId,
    pub action_type: String,
    pub resource_type: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}
