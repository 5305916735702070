//! GraphQL output objects.

use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};
use ticketdesk_db::models::admin::Admin;
use ticketdesk_db::models::role::Role;

use crate::auth::flow::{LoginOutcome, SessionCheck};
use crate::error::AppResult;

/// Message returned whenever an unexpected failure is caught.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(Debug, Clone, SimpleObject)]
pub struct RoleView {
    pub id: ID,
    pub name: String,
    pub permissions: Vec<String>,
}

/// Public admin representation. Never carries the password hash or TOTP secret.
#[derive(Debug, Clone, SimpleObject)]
pub struct AdminView {
    pub id: ID,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub two_factor_enabled: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub role: RoleView,
}

impl AdminView {
    pub fn new(admin: Admin, role: Role) -> Self {
        Self {
            id: ID(admin.id.to_string()),
            username: admin.username,
            email: admin.email,
            full_name: admin.full_name,
            is_active: admin.is_active,
            two_factor_enabled: admin.two_factor_enabled,
            last_login_at: admin.last_login_at,
            role: RoleView {
                id: ID(role.id.to_string()),
                name: role.name,
                permissions: role.permissions,
            },
        }
    }
}

/// Result of `adminLogin` and `adminVerifyTwoFactor`.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct AuthPayload {
    pub success: bool,
    pub message: String,
    /// Session token, present only when `success` is true.
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub requires_two_factor: bool,
    /// Exchanged with a TOTP code via `adminVerifyTwoFactor`.
    pub challenge_token: Option<String>,
    pub admin: Option<AdminView>,
}

impl AuthPayload {
    fn failure(message: &str) -> Self {
        Self {
            message: message.to_string(),
            ..Self::default()
        }
    }
}

impl From<AppResult<LoginOutcome>> for AuthPayload {
    fn from(result: AppResult<LoginOutcome>) -> Self {
        match result {
            Ok(LoginOutcome::Authenticated(session)) => Self {
                success: true,
                message: "Login successful".to_string(),
                token: Some(session.token),
                expires_at: Some(session.expires_at),
                admin: Some(AdminView::new(session.admin, session.role)),
                ..Self::default()
            },
            Ok(LoginOutcome::TwoFactorRequired { challenge }) => Self {
                message: "Two-factor authentication required".to_string(),
                requires_two_factor: true,
                challenge_token: Some(challenge.token),
                expires_at: Some(challenge.expires_at),
                ..Self::default()
            },
            Ok(LoginOutcome::Rejected(reason)) => Self::failure(reason.message()),
            Err(err) => {
                tracing::error!(error = %err, "Authentication failed with server error");
                Self::failure(SERVER_ERROR_MESSAGE)
            }
        }
    }
}

/// Result of `adminValidateSession`.
#[derive(Debug, Clone, Default, SimpleObject)]
pub struct SessionPayload {
    pub valid: bool,
    pub message: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub admin: Option<AdminView>,
}

impl From<AppResult<SessionCheck>> for SessionPayload {
    fn from(result: AppResult<SessionCheck>) -> Self {
        match result {
            Ok(SessionCheck::Valid(session)) => Self {
                valid: true,
                message: None,
                expires_at: Some(session.expires_at),
                admin: Some(AdminView::new(session.admin, session.role)),
            },
            Ok(SessionCheck::Invalid(reason)) => Self {
                message: Some(reason.to_string()),
                ..Self::default()
            },
            Err(err) => {
                tracing::error!(error = %err, "Session validation failed with server error");
                Self {
                    message: Some(SERVER_ERROR_MESSAGE.to_string()),
                    ..Self::default()
                }
            }
        }
    }
}

/// Result of `adminLogout`.
#[derive(Debug, Clone, SimpleObject)]
pub struct LogoutPayload {
    pub success: bool,
    pub message: String,
}

impl From<AppResult<bool>> for LogoutPayload {
    fn from(result: AppResult<bool>) -> Self {
        match result {
            Ok(true) => Self {
                success: true,
                message: "Logged out".to_string(),
            },
            Ok(false) => Self {
                success: true,
                message: "Session already ended".to_string(),
            },
            Err(err) => {
                tracing::error!(error = %err, "Logout failed with server error");
                Self {
                    success: false,
                    message: SERVER_ERROR_MESSAGE.to_string(),
                }
            }
        }
    }
}
