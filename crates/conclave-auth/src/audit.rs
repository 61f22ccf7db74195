//! Best-effort login/logout trail.

use conclave_models::{AuditAction, AuditEntry};
use conclave_observability::track_audit_write_failure;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::{error, instrument};

use crate::error::AuditError;

#[derive(Clone, Debug)]
pub struct AuditSink {
    pool: PgPool,
}

impl AuditSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an entry in the background.
    ///
    /// The write runs on its own task; failures are logged and counted there.
    /// Callers may drop the handle, or await it to observe the outcome.
    pub fn record(
        &self,
        action: AuditAction,
        email: &str,
        details: impl Into<String>,
    ) -> JoinHandle<Result<(), AuditError>> {
        let pool = self.pool.clone();
        let email = email.to_string();
        let details = details.into();

        tokio::spawn(async move {
            let result = insert(&pool, action, &email, &details).await;
            if let Err(e) = &result {
                error!(action = %action, error = %e, "Failed to write audit entry");
                track_audit_write_failure();
            }
            result
        })
    }

    /// Waits for a write started by [`record`](Self::record).
    pub async fn settled(handle: JoinHandle<Result<(), AuditError>>) -> Result<(), AuditError> {
        handle.await?
    }

    /// Newest entries first.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: i64) -> Result<Vec<AuditEntry>, AuditError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, action, user_email, details, created_at
            FROM audit_log
            ORDER BY created_at DESC, id
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

async fn insert(
    pool: &PgPool,
    action: AuditAction,
    email: &str,
    details: &str,
) -> Result<(), AuditError> {
    sqlx::query("INSERT INTO audit_log (action, user_email, details) VALUES ($1, $2, $3)")
        .bind(action.as_str())
        .bind(email)
        .bind(details)
        .execute(pool)
        .await?;

    Ok(())
}
