//! Authentication request and response bodies.
//!
//! Wire fields are camelCase, matching the admin portal client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::permissions::{PermissionSet, permissions_for};
use crate::roles::Role;
use crate::session::Session;

/// Login request. Membership on a role list is the only credential.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_login_email"))]
    #[schema(example = "chair@org.example")]
    pub email: String,
}

// Surrounding whitespace is tolerated here and stripped at login.
fn validate_login_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message("A valid email is required".into()))
    }
}

/// Successful login: the bearer token and what it grants.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub email: String,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl From<&Session> for LoginResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            expires_at: session.expires_at,
            email: session.email.clone(),
            role: session.role,
            permissions: permissions_for(session.role),
        }
    }
}

/// State of the session addressed by the bearer token.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub email: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub permissions: PermissionSet,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            email: session.email.clone(),
            role: session.role,
            expires_at: session.expires_at,
            permissions: permissions_for(session.role),
        }
    }
}

/// The authenticated caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MeResponse {
    pub email: String,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl From<&Session> for MeResponse {
    fn from(session: &Session) -> Self {
        Self {
            email: session.email.clone(),
            role: session.role,
            permissions: permissions_for(session.role),
        }
    }
}

/// Generic success message response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn board_session() -> Session {
        let now = Utc::now();
        Session {
            token: "0123456789abcdef".repeat(4),
            email: "treasurer@org.example".to_string(),
            role: Role::Board,
            created_at: now,
            expires_at: now + Duration::days(30),
            last_activity_at: now,
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: None,
        }
    }

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "chair@org.example".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = LoginRequest {
            email: String::new(),
        };
        assert!(empty.validate().is_err());

        let malformed = LoginRequest {
            email: "not-an-email".to_string(),
        };
        assert!(malformed.validate().is_err());

        let padded = LoginRequest {
            email: "  Chair@Org.Example ".to_string(),
        };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn test_login_response_shape() {
        let session = board_session();
        let json = serde_json::to_value(LoginResponse::from(&session)).unwrap();
        assert_eq!(json["token"], session.token);
        assert_eq!(json["role"], "board");
        assert_eq!(json["email"], "treasurer@org.example");
        assert!(json.get("expiresAt").is_some());
        assert_eq!(json["permissions"]["canProcessVotes"], true);
        assert_eq!(json["permissions"]["canManageUsers"], false);
    }

    #[test]
    fn test_session_response_omits_token() {
        let session = board_session();
        let json = serde_json::to_value(SessionResponse::from(&session)).unwrap();
        assert!(json.get("token").is_none());
        assert!(json.get("expiresAt").is_some());
    }

    #[test]
    fn test_me_response_shape() {
        let json = serde_json::to_value(MeResponse::from(&board_session())).unwrap();
        assert_eq!(json["role"], "board");
        assert!(json.get("expiresAt").is_none());
    }
}
