//! Time-based one-time passwords (RFC 6238) for the admin second factor.
//!
//! Codes are 6 digits over a 30-second step using HMAC-SHA256. Secrets are
//! stored hex-encoded on the admin row.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a time step in seconds.
pub const TOTP_STEP_SECS: i64 = 30;

/// Number of digits in a generated code.
pub const TOTP_DIGITS: usize = 6;

/// Number of steps accepted on either side of the current one.
pub const TOTP_SKEW_STEPS: i64 = 1;

/// Wrong codes tolerated against a single login challenge.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Minimum decoded secret length in bytes (128 bits).
pub const MIN_SECRET_BYTES: usize = 16;

/// Decode and length-check a hex-encoded TOTP secret.
pub fn decode_secret(secret_hex: &str) -> Result<Vec<u8>, CoreError> {
    let secret = hex::decode(secret_hex.trim())
        .map_err(|e| CoreError::Validation(format!("Two-factor secret is not valid hex: {e}")))?;
    if secret.len() < MIN_SECRET_BYTES {
        return Err(CoreError::Validation(format!(
            "Two-factor secret must be at least {MIN_SECRET_BYTES} bytes"
        )));
    }
    Ok(secret)
}

/// Compute the code for a given step counter.
pub fn code_for_counter(secret: &[u8], counter: u64) -> Result<String, CoreError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| CoreError::Internal(format!("HMAC key rejected: {e}")))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // Dynamic truncation.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = u32::from_be_bytes([
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);

    let modulus = 10u32.pow(TOTP_DIGITS as u32);
    Ok(format!("{:0width$}", binary % modulus, width = TOTP_DIGITS))
}

/// Compute the code valid at `unix_time`.
pub fn code_at(secret: &[u8], unix_time: i64) -> Result<String, CoreError> {
    code_for_counter(secret, counter_at(unix_time))
}

/// Verify a user-supplied code against a hex-encoded secret at `unix_time`.
///
/// Returns the step counter the code belongs to, so callers can refuse a step
/// that was already accepted. Returns `Ok(None)` for a well-formed code that
/// matches no step in the skew window, and for input that is not exactly
/// [`TOTP_DIGITS`] digits. Returns `Err` only when the stored secret itself is
/// unusable.
pub fn verify_code(
    secret_hex: &str,
    code: &str,
    unix_time: i64,
) -> Result<Option<i64>, CoreError> {
    let secret = decode_secret(secret_hex)?;
    let code = code.trim();
    if code.len() != TOTP_DIGITS || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }

    let current = step_at(unix_time);
    for step in (current - TOTP_SKEW_STEPS)..=(current + TOTP_SKEW_STEPS) {
        if step < 0 {
            continue;
        }
        if constant_time_eq(code_for_counter(&secret, step as u64)?.as_bytes(), code.as_bytes()) {
            return Ok(Some(step));
        }
    }
    Ok(None)
}

/// Step counter for `unix_time`.
pub fn step_at(unix_time: i64) -> i64 {
    counter_at(unix_time) as i64
}

fn counter_at(unix_time: i64) -> u64 {
    (unix_time.max(0) / TOTP_STEP_SECS) as u64
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
