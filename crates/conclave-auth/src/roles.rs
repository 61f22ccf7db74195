//! Email to role classification.

use std::collections::HashSet;

use conclave_config::RoleConfig;
use conclave_core::normalize_email;
use conclave_models::Role;

/// Source of role membership.
///
/// Resolution is total: anything not recognised is [`Role::Viewer`].
pub trait RoleProvider: Send + Sync {
    fn resolve(&self, email: &str) -> Role;
}

/// Membership taken from fixed lists, checked in priority order
/// admin > board > advisory.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleProvider {
    admins: HashSet<String>,
    board: HashSet<String>,
    advisory: HashSet<String>,
}

impl StaticRoleProvider {
    pub fn new(config: &RoleConfig) -> Self {
        let collect = |emails: &[String]| -> HashSet<String> {
            emails.iter().map(|e| normalize_email(e)).collect()
        };

        Self {
            admins: collect(&config.admin_emails),
            board: collect(&config.board_emails),
            advisory: collect(&config.advisory_emails),
        }
    }

    pub fn from_env() -> Self {
        Self::new(&RoleConfig::from_env())
    }
}

impl From<RoleConfig> for StaticRoleProvider {
    fn from(config: RoleConfig) -> Self {
        Self::new(&config)
    }
}

impl RoleProvider for StaticRoleProvider {
    fn resolve(&self, email: &str) -> Role {
        let email = normalize_email(email);

        if email.is_empty() {
            Role::Viewer
        } else if self.admins.contains(&email) {
            Role::Admin
        } else if self.board.contains(&email) {
            Role::Board
        } else if self.advisory.contains(&email) {
            Role::Advisory
        } else {
            Role::Viewer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticRoleProvider {
        StaticRoleProvider::new(&RoleConfig::new(
            vec!["chair@org.example", "both@org.example"],
            vec!["treasurer@org.example", "both@org.example"],
            vec!["mentor@org.example"],
        ))
    }

    #[test]
    fn test_resolves_each_list() {
        let roles = provider();
        assert_eq!(roles.resolve("chair@org.example"), Role::Admin);
        assert_eq!(roles.resolve("treasurer@org.example"), Role::Board);
        assert_eq!(roles.resolve("mentor@org.example"), Role::Advisory);
    }

    #[test]
    fn test_unknown_is_viewer() {
        let roles = provider();
        assert_eq!(roles.resolve("nobody@nowhere.example"), Role::Viewer);
        assert_eq!(roles.resolve(""), Role::Viewer);
        assert_eq!(roles.resolve("   "), Role::Viewer);
        assert_eq!(roles.resolve("not an email at all"), Role::Viewer);
    }

    #[test]
    fn test_normalizes_before_lookup() {
        let roles = provider();
        assert_eq!(roles.resolve("  CHAIR@Org.Example "), Role::Admin);
    }

    #[test]
    fn test_priority_on_overlap() {
        assert_eq!(provider().resolve("both@org.example"), Role::Admin);
    }

    #[test]
    fn test_empty_config_denies_everyone() {
        let roles = StaticRoleProvider::default();
        assert_eq!(roles.resolve("chair@org.example"), Role::Viewer);
    }
}
