//! Operator commands for the Conclave session store.
//!
//! The binary in `main.rs` parses arguments and prompts; everything that
//! touches the database or the role lists lives here.

use conclave_auth::{
    AuditError, AuditSink, PgSessionStore, RoleProvider, StaticRoleProvider, StoreError,
};
use conclave_config::RoleConfig;
use conclave_models::{AuditEntry, PermissionSet, Role, permissions_for};
use sqlx::PgPool;

/// Deletes every expired session row.
pub async fn prune_sessions(pool: &PgPool) -> Result<u64, StoreError> {
    PgSessionStore::new(pool.clone()).delete_expired().await
}

/// Deletes every session of `email`. Running servers keep serving cached
/// copies until their cache entries expire or age out.
pub async fn revoke_sessions(pool: &PgPool, email: &str) -> Result<u64, StoreError> {
    PgSessionStore::new(pool.clone()).delete_for_email(email).await
}

pub async fn count_active_sessions(pool: &PgPool) -> Result<i64, StoreError> {
    PgSessionStore::new(pool.clone()).count_active().await
}

pub async fn recent_audit(pool: &PgPool, limit: i64) -> Result<Vec<AuditEntry>, AuditError> {
    AuditSink::new(pool.clone()).recent(limit).await
}

/// What a login with `email` would be granted under `config`.
pub fn resolve_role(config: &RoleConfig, email: &str) -> (Role, PermissionSet) {
    let role = StaticRoleProvider::new(config).resolve(email);
    (role, permissions_for(role))
}

pub fn format_role_report(email: &str, role: Role, permissions: &PermissionSet) -> String {
    let mut report = format!("{email}: {role}");

    if role.can_hold_session() {
        let granted = permissions.granted();
        if granted.is_empty() {
            report.push_str("\n   (no capabilities)");
        }
        for capability in granted {
            report.push_str(&format!("\n   - {capability}"));
        }
    } else {
        report.push_str("\n   login would be refused");
    }

    report
}

pub fn format_audit_entry(entry: &AuditEntry) -> String {
    format!(
        "{}  {:<6}  {}  {}",
        entry.created_at.format("%Y-%m-%d %H:%M:%S"),
        entry.action,
        entry.user_email,
        entry.details.as_deref().unwrap_or("-")
    )
}
