//! Format checks for admin identity fields.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;

/// Minimum length of a username.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 50;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.\-]*$").expect("valid regex"));

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Validate a username: 3-50 characters, ASCII letters, digits, `_`, `.`
/// and `-`, starting with a letter or digit.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(CoreError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-'".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_ordinary_email() {
        assert!(validate_email("box-office@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        assert_matches!(validate_email("not-an-email"), Err(CoreError::Validation(_)));
        assert_matches!(validate_email("a@"), Err(CoreError::Validation(_)));
        assert_matches!(validate_email(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn accepts_valid_usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("ops.team-1").is_ok());
        assert!(validate_username("a_b").is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        assert_matches!(validate_username("ab"), Err(CoreError::Validation(_)));
        assert_matches!(validate_username("_leading"), Err(CoreError::Validation(_)));
        assert_matches!(validate_username("has space"), Err(CoreError::Validation(_)));
        let too_long = "x".repeat(MAX_USERNAME_LENGTH + 1);
        assert_matches!(validate_username(&too_long), Err(CoreError::Validation(_)));
    }
}
