//! Audit trail entries.
//!
//! Entries are diagnostic. Their presence or absence says nothing about
//! whether a session is valid.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Login,
    Logout,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub user_email: String,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query parameters for listing recent audit entries.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams, ToSchema)]
pub struct AuditQuery {
    /// Maximum number of entries to return (default 50, max 500)
    #[validate(range(min = 1, max = 500))]
    pub limit: Option<i64>,
}

impl AuditQuery {
    pub const DEFAULT_LIMIT: i64 = 50;

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_as_str() {
        assert_eq!(AuditAction::Login.as_str(), "login");
        assert_eq!(AuditAction::Logout.to_string(), "logout");
    }

    #[test]
    fn test_query_default_limit() {
        let query = AuditQuery { limit: None };
        assert_eq!(query.limit(), 50);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_query_rejects_oversized_limit() {
        let query = AuditQuery { limit: Some(501) };
        assert!(query.validate().is_err());
    }
}
