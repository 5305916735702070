//! JWT generation and validation for admin sessions.
//!
//! Two kinds of HS256 token share one claims layout and are told apart by the
//! `purpose` claim:
//!
//! - **session** tokens are handed to the admin panel after a completed login
//!   and are backed by an `admin_sessions` row (stored as a SHA-256 digest);
//! - **two-factor challenge** tokens prove the password step succeeded and
//!   are exchanged, together with a TOTP code, for a session token.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use ticketdesk_core::hashing::sha256_hex;
use ticketdesk_core::types::{DbId, Timestamp};
use uuid::Uuid;

/// What a token may be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    TwoFactor,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the admin's internal database id.
    pub sub: DbId,
    /// The admin's username at issue time.
    pub username: String,
    pub purpose: TokenPurpose,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4); keeps digests of tokens issued in
    /// the same second distinct.
    pub jti: String,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session token lifetime in hours (default: 8).
    pub session_expiry_hours: i64,
    /// Two-factor challenge lifetime in minutes (default: 5).
    pub two_factor_challenge_mins: i64,
}

/// Default session token expiry in hours.
const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 8;
/// Default two-factor challenge expiry in minutes.
const DEFAULT_CHALLENGE_EXPIRY_MINS: i64 = 5;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `JWT_SECRET`                | **yes**  | --      |
    /// | `SESSION_EXPIRY_HOURS`      | no       | `8`     |
    /// | `TWO_FACTOR_CHALLENGE_MINS` | no       | `5`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_expiry_hours: i64 = std::env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_HOURS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_HOURS must be a valid i64");

        let two_factor_challenge_mins: i64 = std::env::var("TWO_FACTOR_CHALLENGE_MINS")
            .unwrap_or_else(|_| DEFAULT_CHALLENGE_EXPIRY_MINS.to_string())
            .parse()
            .expect("TWO_FACTOR_CHALLENGE_MINS must be a valid i64");

        Self {
            secret,
            session_expiry_hours,
            two_factor_challenge_mins,
        }
    }

    /// Build a config with the default lifetimes and the given secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            session_expiry_hours: DEFAULT_SESSION_EXPIRY_HOURS,
            two_factor_challenge_mins: DEFAULT_CHALLENGE_EXPIRY_MINS,
        }
    }
}

/// Errors from token issue or validation.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Token purpose mismatch: expected {expected:?}, got {actual:?}")]
    WrongPurpose {
        expected: TokenPurpose,
        actual: TokenPurpose,
    },

    #[error("Token expiry is out of range")]
    InvalidExpiry,
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// The `jti` claim embedded in `token`.
    pub jti: String,
    pub expires_at: Timestamp,
}

/// Issue a session token valid for [`JwtConfig::session_expiry_hours`].
pub fn issue_session_token(
    admin_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<IssuedToken, TokenError> {
    issue(
        admin_id,
        username,
        TokenPurpose::Session,
        config.session_expiry_hours * 3600,
        config,
    )
}

/// Issue a two-factor challenge token valid for
/// [`JwtConfig::two_factor_challenge_mins`].
pub fn issue_two_factor_challenge(
    admin_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<IssuedToken, TokenError> {
    issue(
        admin_id,
        username,
        TokenPurpose::TwoFactor,
        config.two_factor_challenge_mins * 60,
        config,
    )
}

fn issue(
    admin_id: DbId,
    username: &str,
    purpose: TokenPurpose,
    lifetime_secs: i64,
    config: &JwtConfig,
) -> Result<IssuedToken, TokenError> {
    let now = Utc::now().timestamp();
    let exp = now + lifetime_secs;

    let jti = Uuid::new_v4().to_string();
    let claims = Claims {
        sub: admin_id,
        username: username.to_string(),
        purpose,
        exp,
        iat: now,
        jti: jti.clone(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    let expires_at = DateTime::<Utc>::from_timestamp(exp, 0).ok_or(TokenError::InvalidExpiry)?;

    Ok(IssuedToken {
        token,
        jti,
        expires_at,
    })
}

/// Validate a token and check it was issued for `expected` use.
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    expected: TokenPurpose,
    config: &JwtConfig,
) -> Result<Claims, TokenError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;

    let claims = token_data.claims;
    if claims.purpose != expected {
        return Err(TokenError::WrongPurpose {
            expected,
            actual: claims.purpose,
        });
    }
    Ok(claims)
}

/// Digest under which a session token is stored server-side.
pub fn session_token_hash(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
