//! Durable session table. The source of truth for every process.

use std::time::Duration;

use conclave_core::{normalize_email, token_fragment};
use conclave_models::{Provenance, Role, Session};
use rand::RngCore;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::error::StoreError;

/// Bytes of entropy in a session token (hex-encoded to twice as many characters).
pub const TOKEN_BYTES: usize = 32;

const SESSION_COLUMNS: &str =
    "token, email, role, created_at, expires_at, last_activity, ip_address, user_agent";

/// Fresh opaque bearer token from the thread-local CSPRNG.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Clone, Debug)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a new session expiring `ttl` after now.
    ///
    /// Timestamps come from the database clock so every instance agrees on expiry.
    #[instrument(skip(self, provenance))]
    pub async fn create(
        &self,
        email: &str,
        role: Role,
        ttl: Duration,
        provenance: &Provenance,
    ) -> Result<Session, StoreError> {
        let token = generate_token();

        let session = sqlx::query_as::<_, Session>(&format!(
            r#"
            INSERT INTO sessions (token, email, role, created_at, expires_at, last_activity, ip_address, user_agent)
            VALUES ($1, $2, $3, NOW(), NOW() + make_interval(secs => $4), NOW(), $5, $6)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(&token)
        .bind(normalize_email(email))
        .bind(role)
        .bind(ttl.as_secs_f64())
        .bind(&provenance.ip_address)
        .bind(&provenance.user_agent)
        .fetch_one(&self.pool)
        .await?;

        debug!(token = %token_fragment(&session.token), "Session row inserted");

        Ok(session)
    }

    /// Returns the session only while it is unexpired. Expired and unknown
    /// tokens are indistinguishable.
    #[instrument(skip_all, fields(token = %token_fragment(token)))]
    pub async fn find_valid(&self, token: &str) -> Result<Option<Session>, StoreError> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE token = $1 AND expires_at > NOW()"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    #[instrument(skip_all, fields(token = %token_fragment(token)))]
    pub async fn touch(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE sessions SET last_activity = GREATEST(last_activity, NOW()) WHERE token = $1",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes the row if present and returns the email it belonged to.
    /// Deleting an absent token succeeds with `None`.
    #[instrument(skip_all, fields(token = %token_fragment(token)))]
    pub async fn delete(&self, token: &str) -> Result<Option<String>, StoreError> {
        let email = sqlx::query_scalar::<_, String>(
            "DELETE FROM sessions WHERE token = $1 RETURNING email",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(email)
    }

    #[instrument(skip(self))]
    pub async fn delete_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Revokes every session belonging to `email`.
    #[instrument(skip(self))]
    pub async fn delete_for_email(&self, email: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE email = $1")
            .bind(normalize_email(email))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn count_active(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sessions WHERE expires_at > NOW()",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_pairwise_distinct() {
        let tokens: HashSet<String> = (0..10_000).map(|_| generate_token()).collect();
        assert_eq!(tokens.len(), 10_000);
    }
}
