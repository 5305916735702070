//! Admin account model and DTOs.

use sqlx::FromRow;
use ticketdesk_core::types::{DbId, Timestamp};

/// Full admin row from the `admins` table.
///
/// Contains the password hash and TOTP secret -- never expose this struct
/// through the API directly.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub two_factor_enabled: bool,
    pub two_factor_secret: Option<String>,
    pub role_id: DbId,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new admin.
#[derive(Debug, Clone)]
pub struct CreateAdmin {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub full_name: String,
    pub role_id: DbId,
}
