//! Static role-membership lists.
//!
//! Membership is configuration, not code: each list is a comma-separated
//! environment variable of email addresses.
//!
//! # Environment Variables
//!
//! - `ADMIN_EMAILS`: Addresses granted the admin role
//! - `BOARD_EMAILS`: Addresses granted the board role
//! - `ADVISORY_EMAILS`: Addresses granted the advisory role
//!
//! Entries are trimmed and lower-cased. An address listed in more than one
//! variable resolves to the highest role (admin > board > advisory).

use std::env;

use crate::split_list;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleConfig {
    pub admin_emails: Vec<String>,
    pub board_emails: Vec<String>,
    pub advisory_emails: Vec<String>,
}

impl RoleConfig {
    pub fn from_env() -> Self {
        Self {
            admin_emails: read_list("ADMIN_EMAILS"),
            board_emails: read_list("BOARD_EMAILS"),
            advisory_emails: read_list("ADVISORY_EMAILS"),
        }
    }

    /// Builds a config from explicit lists, applying the same normalization as `from_env`.
    pub fn new<I, S>(admins: I, board: I, advisory: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_emails: normalize(admins),
            board_emails: normalize(board),
            advisory_emails: normalize(advisory),
        }
    }
}

fn read_list(key: &str) -> Vec<String> {
    let raw = env::var(key).unwrap_or_default();
    normalize(split_list(&raw))
}

fn normalize<I, S>(emails: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    emails
        .into_iter()
        .map(|e| e.as_ref().trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_entries() {
        let config = RoleConfig::new(
            vec![" Chair@Org.Example ", ""],
            vec!["TREASURER@org.example"],
            vec![],
        );
        assert_eq!(config.admin_emails, vec!["chair@org.example"]);
        assert_eq!(config.board_emails, vec!["treasurer@org.example"]);
        assert!(config.advisory_emails.is_empty());
    }

    #[test]
    fn test_split_list_drops_blanks() {
        let list = normalize(split_list("a@x.example, ,B@x.example,"));
        assert_eq!(list, vec!["a@x.example", "b@x.example"]);
    }
}
