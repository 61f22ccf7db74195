use conclave_core::AppError;
use thiserror::Error;
use tokio::task::JoinError;

/// Failure of the durable session store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store lookup timed out")]
    Timeout,
}

/// Failure to append to the audit trail. Logged, never returned to an HTTP caller.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Audit write failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Audit task failed: {0}")]
    Task(#[from] JoinError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    MissingToken,

    #[error("Invalid or expired session")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("Session store unavailable")]
    Persistence(#[from] StoreError),
}

impl AuthError {
    /// Generic denial that does not reveal which list, if any, an email is on.
    pub fn access_denied() -> Self {
        Self::Forbidden("Access denied".to_string())
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            Self::Validation(_) => AppError::bad_request(self),
            Self::MissingToken | Self::Unauthenticated => AppError::unauthorized(self),
            Self::Forbidden(_) => AppError::forbidden(self),
            Self::Persistence(_) => AppError::internal(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::Validation("Email is required".into()), 400),
            (AuthError::MissingToken, 401),
            (AuthError::Unauthenticated, 401),
            (AuthError::access_denied(), 403),
            (AuthError::Persistence(StoreError::Timeout), 500),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_app_error().status.as_u16(), expected);
        }
    }

    #[test]
    fn test_persistence_message_hides_cause() {
        let err = AuthError::Persistence(StoreError::Database(sqlx::Error::PoolTimedOut));
        let app_error = err.into_app_error();
        assert_eq!(app_error.error.to_string(), "Session store unavailable");
    }

    #[test]
    fn test_unauthenticated_messages() {
        assert_eq!(
            AuthError::Unauthenticated.to_string(),
            "Invalid or expired session"
        );
        assert_eq!(AuthError::MissingToken.to_string(), "Authentication required");
        assert_eq!(AuthError::access_denied().to_string(), "Access denied");
    }
}
