//! Admin activity log vocabulary.
//!
//! Activity rows are free text, so this module also owns the rules for what
//! may be written into the `details` column.

// ---------------------------------------------------------------------------
// Action type constants
// ---------------------------------------------------------------------------

/// Known action types for admin activity entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const LOGIN_TWO_FACTOR_CHALLENGE: &str = "login_two_factor_challenge";
    pub const TWO_FACTOR_FAILED: &str = "two_factor_failed";
    pub const LOGOUT: &str = "logout";
    pub const ADMIN_CREATE: &str = "admin_create";
    pub const ADMIN_UPDATE: &str = "admin_update";
}

/// Resource types an activity entry can refer to.
pub mod resource_types {
    pub const AUTH: &str = "auth";
    pub const ADMIN: &str = "admin";
    pub const SESSION: &str = "session";
}

// ---------------------------------------------------------------------------
// Details sanitisation
// ---------------------------------------------------------------------------

/// Maximum number of characters stored in an activity `details` column.
pub const MAX_DETAILS_CHARS: usize = 500;

/// Words that must never appear next to a value in activity details.
const SENSITIVE_MARKERS: &[&str] = &["password", "token", "secret", "code"];

/// Prepare free-text details for storage.
///
/// Any `key=value` pair whose key contains a sensitive marker has its value
/// replaced with `[REDACTED]`, and the result is capped at
/// [`MAX_DETAILS_CHARS`] characters.
pub fn sanitize_details(details: &str) -> String {
    let redacted = details
        .split(' ')
        .map(|word| match word.split_once('=') {
            Some((key, _)) if is_sensitive_key(key) => format!("{key}=[REDACTED]"),
            _ => word.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    redacted.chars().take(MAX_DETAILS_CHARS).collect()
}

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|m| lower.contains(m))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
