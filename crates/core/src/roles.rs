//! Well-known admin role names.
//!
//! These must match the seed rows in `20261001000002_create_admin_roles.sql`.

pub const ROLE_SUPER_ADMIN: &str = "super_admin";
pub const ROLE_EVENT_MANAGER: &str = "event_manager";
pub const ROLE_SUPPORT: &str = "support";

/// All seeded role names, in seed order.
pub const ALL_ROLES: [&str; 3] = [ROLE_SUPER_ADMIN, ROLE_EVENT_MANAGER, ROLE_SUPPORT];

/// Returns `true` if `name` is one of the seeded role names.
pub fn is_known_role(name: &str) -> bool {
    ALL_ROLES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_roles_are_known() {
        for role in ALL_ROLES {
            assert!(is_known_role(role));
        }
        assert!(!is_known_role("root"));
        assert!(!is_known_role("Super_Admin"));
    }
}
