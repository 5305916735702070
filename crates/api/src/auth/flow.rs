//! The admin authentication sequence.
//!
//! Login is a fixed linear sequence: reject unknown username, reject inactive
//! account, reject wrong password, branch on the two-factor flag, issue a
//! session token, then record the login timestamp and an activity entry.
//!
//! Functions here return `Ok` for every *expected* outcome, including
//! rejections; `Err` is reserved for infrastructure failures (database,
//! hashing, signing) that callers report as a server error.
//!
//! Each successful step commits its writes (session row, login timestamp,
//! activity entry, challenge bookkeeping) in a single transaction.

use chrono::Utc;
use sqlx::{PgExecutor, Postgres, Transaction};
use ticketdesk_core::audit::{action_types, resource_types};
use ticketdesk_core::error::CoreError;
use ticketdesk_core::two_factor;
use ticketdesk_core::types::{DbId, Timestamp};
use ticketdesk_db::models::activity::CreateActivity;
use ticketdesk_db::models::admin::Admin;
use ticketdesk_db::models::role::Role;
use ticketdesk_db::models::session::CreateSession;
use ticketdesk_db::models::two_factor_challenge::CreateTwoFactorChallenge;
use ticketdesk_db::repositories::{
    ActivityRepo, AdminRepo, RoleRepo, SessionRepo, TwoFactorChallengeRepo,
};
use ticketdesk_db::DbPool;

use crate::auth::jwt::{
    issue_session_token, issue_two_factor_challenge, session_token_hash, validate_token,
    IssuedToken, JwtConfig, TokenPurpose,
};
use crate::auth::password::verify_password;
use crate::error::AppResult;
use crate::middleware::auth::ClientInfo;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a login or second-factor attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    InvalidCredentials,
    InactiveAccount,
    InvalidTwoFactorCode,
    InvalidChallenge,
}

impl LoginRejection {
    /// Client-facing message. Unknown usernames and wrong passwords share one
    /// message so the response does not reveal which accounts exist.
    pub fn message(self) -> &'static str {
        match self {
            LoginRejection::InvalidCredentials => "Invalid credentials",
            LoginRejection::InactiveAccount => "Account is inactive",
            LoginRejection::InvalidTwoFactorCode => "Invalid two-factor code",
            LoginRejection::InvalidChallenge => "Two-factor challenge is invalid or has expired",
        }
    }
}

/// A completed login: the signed session token and who it belongs to.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub token: String,
    pub expires_at: Timestamp,
    pub admin: Admin,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Authenticated(AuthenticatedSession),
    /// Password accepted; a TOTP code must be presented with this challenge.
    TwoFactorRequired { challenge: IssuedToken },
    Rejected(LoginRejection),
}

/// A session that passed every validation check.
#[derive(Debug, Clone)]
pub struct ValidSession {
    pub admin: Admin,
    pub role: Role,
    pub expires_at: Timestamp,
}

#[derive(Debug, Clone)]
pub enum SessionCheck {
    Valid(ValidSession),
    Invalid(&'static str),
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Authenticate with username and password.
pub async fn login(
    pool: &DbPool,
    jwt: &JwtConfig,
    username: &str,
    password: &str,
    client: &ClientInfo,
) -> AppResult<LoginOutcome> {
    // 1. Find admin by username.
    let Some(admin) = AdminRepo::find_by_username(pool, username).await? else {
        tracing::warn!(%username, "Login rejected: unknown username");
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidCredentials));
    };

    // 2. Check the account is active.
    if !admin.is_active {
        tracing::warn!(admin_id = admin.id, "Login rejected: inactive account");
        return Ok(LoginOutcome::Rejected(LoginRejection::InactiveAccount));
    }

    // 3. Verify password.
    if !verify_password(password, &admin.password_hash)? {
        tracing::warn!(admin_id = admin.id, "Login rejected: wrong password");
        record_activity(
            pool,
            admin.id,
            action_types::LOGIN_FAILED,
            resource_types::AUTH,
            "Wrong password",
            client,
        )
        .await?;
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidCredentials));
    }

    // 4. Branch on the two-factor flag.
    if admin.two_factor_enabled {
        let challenge = issue_two_factor_challenge(admin.id, &admin.username, jwt)?;

        let mut tx = pool.begin().await?;
        TwoFactorChallengeRepo::create(
            &mut *tx,
            &CreateTwoFactorChallenge {
                admin_id: admin.id,
                jti: challenge.jti.clone(),
                expires_at: challenge.expires_at,
            },
        )
        .await?;
        record_activity(
            &mut *tx,
            admin.id,
            action_types::LOGIN_TWO_FACTOR_CHALLENGE,
            resource_types::AUTH,
            "Password accepted, awaiting second factor",
            client,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(admin_id = admin.id, "Two-factor challenge issued");
        return Ok(LoginOutcome::TwoFactorRequired { challenge });
    }

    // 5. Issue token, persist session, record login.
    let role = load_role(pool, &admin).await?;
    let mut tx = pool.begin().await?;
    let session = start_session(&mut tx, jwt, admin, role, client).await?;
    tx.commit().await?;
    Ok(LoginOutcome::Authenticated(session))
}

/// Complete a login that stopped at the two-factor step.
///
/// A challenge is single-use and closes after
/// [`two_factor::MAX_FAILED_ATTEMPTS`] wrong codes. A code whose time step is
/// not newer than the last accepted one is refused, so an observed code
/// cannot be replayed against a fresh challenge either.
///
/// `now` is the Unix time used for TOTP step calculation.
pub async fn verify_two_factor(
    pool: &DbPool,
    jwt: &JwtConfig,
    challenge_token: &str,
    code: &str,
    client: &ClientInfo,
    now: i64,
) -> AppResult<LoginOutcome> {
    let Ok(claims) = validate_token(challenge_token, TokenPurpose::TwoFactor, jwt) else {
        tracing::warn!("Two-factor rejected: bad challenge token");
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidChallenge));
    };

    let challenge = TwoFactorChallengeRepo::find_open_by_jti(
        pool,
        &claims.jti,
        two_factor::MAX_FAILED_ATTEMPTS,
    )
    .await?;
    let Some(challenge) = challenge.filter(|c| c.admin_id == claims.sub) else {
        tracing::warn!(admin_id = claims.sub, "Two-factor rejected: challenge used or closed");
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidChallenge));
    };

    let Some(admin) = AdminRepo::find_by_id(pool, claims.sub).await? else {
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidChallenge));
    };

    if !admin.is_active {
        tracing::warn!(admin_id = admin.id, "Two-factor rejected: inactive account");
        return Ok(LoginOutcome::Rejected(LoginRejection::InactiveAccount));
    }

    // The flag may have been switched off after the challenge was issued.
    let secret = match (admin.two_factor_enabled, admin.two_factor_secret.as_deref()) {
        (true, Some(secret)) => secret.to_string(),
        (true, None) => {
            return Err(CoreError::Internal(format!(
                "Admin {} has two-factor enabled without a secret",
                admin.id
            ))
            .into())
        }
        (false, _) => return Ok(LoginOutcome::Rejected(LoginRejection::InvalidChallenge)),
    };

    let Some(step) = two_factor::verify_code(&secret, code, now)? else {
        reject_code(pool, challenge.id, admin.id, "Wrong two-factor code", client).await?;
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidTwoFactorCode));
    };

    let role = load_role(pool, &admin).await?;
    let mut tx = pool.begin().await?;

    if !TwoFactorChallengeRepo::consume(&mut *tx, challenge.id, two_factor::MAX_FAILED_ATTEMPTS)
        .await?
    {
        tracing::warn!(admin_id = admin.id, "Two-factor rejected: challenge consumed concurrently");
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidChallenge));
    }

    if !AdminRepo::advance_two_factor_step(&mut *tx, admin.id, step).await? {
        tx.rollback().await?;
        reject_code(pool, challenge.id, admin.id, "Reused two-factor code", client).await?;
        return Ok(LoginOutcome::Rejected(LoginRejection::InvalidTwoFactorCode));
    }

    let session = start_session(&mut tx, jwt, admin, role, client).await?;
    tx.commit().await?;
    Ok(LoginOutcome::Authenticated(session))
}

/// Check a session token: signature and expiry, a live session row, and an
/// existing active admin.
pub async fn validate_session(
    pool: &DbPool,
    jwt: &JwtConfig,
    token: &str,
) -> AppResult<SessionCheck> {
    let Ok(claims) = validate_token(token, TokenPurpose::Session, jwt) else {
        return Ok(SessionCheck::Invalid("Invalid or expired token"));
    };

    let hash = session_token_hash(token);
    let Some(session) = SessionRepo::find_active_by_token_hash(pool, &hash).await? else {
        return Ok(SessionCheck::Invalid("Session has expired or been revoked"));
    };

    if session.admin_id != claims.sub {
        tracing::warn!(
            session_admin = session.admin_id,
            token_admin = claims.sub,
            "Session row does not match token subject"
        );
        return Ok(SessionCheck::Invalid("Invalid or expired token"));
    }

    let Some(admin) = AdminRepo::find_by_id(pool, session.admin_id).await? else {
        return Ok(SessionCheck::Invalid("Admin not found"));
    };
    if !admin.is_active {
        return Ok(SessionCheck::Invalid(LoginRejection::InactiveAccount.message()));
    }

    let role = load_role(pool, &admin).await?;

    Ok(SessionCheck::Valid(ValidSession {
        admin,
        role,
        expires_at: session.expires_at,
    }))
}

/// End the session behind `token`.
///
/// Returns `true` if a live session was invalidated, `false` if none matched
/// (already logged out, expired and purged, or never issued).
pub async fn logout(pool: &DbPool, token: &str, client: &ClientInfo) -> AppResult<bool> {
    let hash = session_token_hash(token);
    let Some(admin_id) = SessionRepo::invalidate_by_token_hash(pool, &hash).await? else {
        return Ok(false);
    };

    record_activity(
        pool,
        admin_id,
        action_types::LOGOUT,
        resource_types::SESSION,
        "Session ended",
        client,
    )
    .await?;
    tracing::info!(admin_id, "Admin logged out");
    Ok(true)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue a session token, persist its session row, update `last_login_at`
/// and record the login, all on `tx`.
async fn start_session(
    tx: &mut Transaction<'_, Postgres>,
    jwt: &JwtConfig,
    admin: Admin,
    role: Role,
    client: &ClientInfo,
) -> AppResult<AuthenticatedSession> {
    let issued = issue_session_token(admin.id, &admin.username, jwt)?;

    SessionRepo::create(
        &mut **tx,
        &CreateSession {
            admin_id: admin.id,
            token_hash: session_token_hash(&issued.token),
            expires_at: issued.expires_at,
            user_agent: client.user_agent.clone(),
            ip_address: client.ip_address.clone(),
        },
    )
    .await?;

    AdminRepo::record_login(&mut **tx, admin.id).await?;
    record_activity(
        &mut **tx,
        admin.id,
        action_types::LOGIN,
        resource_types::AUTH,
        "Logged in",
        client,
    )
    .await?;

    tracing::info!(admin_id = admin.id, role = %role.name, "Admin logged in");

    // Reflect the login timestamp just written without another round trip.
    let admin = Admin {
        last_login_at: Some(Utc::now()),
        ..admin
    };

    Ok(AuthenticatedSession {
        token: issued.token,
        expires_at: issued.expires_at,
        admin,
        role,
    })
}

/// Count a wrong or reused code against the challenge and log it.
async fn reject_code(
    pool: &DbPool,
    challenge_id: DbId,
    admin_id: DbId,
    details: &str,
    client: &ClientInfo,
) -> AppResult<()> {
    tracing::warn!(admin_id, reason = details, "Two-factor rejected");
    TwoFactorChallengeRepo::record_failure(pool, challenge_id).await?;
    record_activity(
        pool,
        admin_id,
        action_types::TWO_FACTOR_FAILED,
        resource_types::AUTH,
        details,
        client,
    )
    .await
}

/// Resolve the admin's role. A dangling role reference is a data error.
pub async fn load_role(pool: &DbPool, admin: &Admin) -> AppResult<Role> {
    RoleRepo::find_by_id(pool, admin.role_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Role",
                id: admin.role_id,
            }
            .into()
        })
}

async fn record_activity<'e>(
    executor: impl PgExecutor<'e>,
    admin_id: DbId,
    action_type: &str,
    resource_type: &str,
    details: &str,
    client: &ClientInfo,
) -> AppResult<()> {
    ActivityRepo::create(
        executor,
        &CreateActivity {
            admin_id,
            action_type: action_type.to_string(),
            resource_type: resource_type.to_string(),
            details: Some(details.to_string()),
            ip_address: client.ip_address.clone(),
        },
    )
    .await?;
    Ok(())
}
