//! Well-known role and identity-kind constants.
//!
//! Caretaker roles must match the `chk_caretakers_role` constraint in the
//! caretakers migration.

/// Caretaker allowed to manage the family (settings, caretakers, deletes).
pub const ROLE_ADMIN: &str = "ADMIN";
/// Regular caretaker: may log activities.
pub const ROLE_USER: &str = "USER";
/// Role carried by account-owner tokens.
pub const ROLE_OWNER: &str = "OWNER";
/// Role carried by sysadmin tokens.
pub const ROLE_SYSADMIN: &str = "SYSADMIN";
/// Role carried by setup-token tokens.
pub const ROLE_SETUP: &str = "SETUP";

/// Valid caretaker roles.
pub const VALID_CARETAKER_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_USER];

/// Kinds of principal a bearer token can represent.
pub mod kinds {
    pub const CARETAKER: &str = "caretaker";
    pub const ACCOUNT: &str = "account";
    pub const SYSADMIN: &str = "sysadmin";
    pub const SETUP: &str = "setup";
}

/// Returns `true` if `role` is a valid caretaker role.
pub fn is_caretaker_role(role: &str) -> bool {
    VALID_CARETAKER_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caretaker_roles() {
        assert!(is_caretaker_role("ADMIN"));
        assert!(is_caretaker_role("USER"));
        assert!(!is_caretaker_role("OWNER"));
        assert!(!is_caretaker_role("admin"));
    }
}
