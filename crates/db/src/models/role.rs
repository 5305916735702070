//! Admin role model.

use sqlx::FromRow;
use ticketdesk_core::types::{DbId, Timestamp};

/// A role row from the `admin_roles` table.
#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub permissions: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
