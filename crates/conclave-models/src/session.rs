use std::fmt;

use chrono::{DateTime, Utc};

use crate::roles::Role;

/// A persisted session row.
///
/// `role` is a snapshot taken at login; it is never re-derived from the
/// membership lists while the session lives.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[sqlx(rename = "last_activity")]
    pub last_activity_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Session {
    /// A session is live while `expires_at` is strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// The token is a bearer secret; keep it out of debug output.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .field("last_activity_at", &self.last_activity_at)
            .field("ip_address", &self.ip_address)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Where a login came from. Advisory metadata only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session_expiring(expires_at: DateTime<Utc>) -> Session {
        Session {
            token: "f".repeat(64),
            email: "chair@org.example".to_string(),
            role: Role::Admin,
            created_at: expires_at - Duration::days(30),
            expires_at,
            last_activity_at: expires_at - Duration::days(30),
            ip_address: None,
            user_agent: None,
        }
    }

    #[test]
    fn test_expiry_boundary_is_expired() {
        let now = Utc::now();
        assert!(session_expiring(now).is_expired_at(now));
        assert!(!session_expiring(now + Duration::seconds(1)).is_expired_at(now));
    }

    #[test]
    fn test_debug_hides_token() {
        let session = session_expiring(Utc::now());
        let debug = format!("{:?}", session);
        assert!(!debug.contains(&session.token));
        assert!(debug.contains("chair@org.example"));
    }
}
