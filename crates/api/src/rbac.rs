//! Role checks for team-scoped operations.
//!
//! The tenant owner (the user whose id *is* the business id) passes every
//! check without holding a membership. Members are checked against their
//! membership role.

use sitedesk_core::types::Role;

/// May this role send invitations on behalf of the tenant?
pub fn can_invite(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

/// May this role change member roles or remove members?
pub fn can_manage_team(role: Role) -> bool {
    matches!(role, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_permissions() {
        assert!(can_invite(Role::Admin));
        assert!(can_invite(Role::Manager));
        assert!(!can_invite(Role::User));
    }

    #[test]
    fn test_team_management_is_admin_only() {
        assert!(can_manage_team(Role::Admin));
        assert!(!can_manage_team(Role::Manager));
        assert!(!can_manage_team(Role::User));
    }
}
