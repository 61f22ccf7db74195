//! Session lifecycle: login, verification and logout.

use std::sync::Arc;

use conclave_cache::SessionCache;
use conclave_config::SessionConfig;
use conclave_core::{normalize_email, token_fragment};
use conclave_models::{AuditAction, Provenance, Role, Session};
use conclave_observability::{track_login, track_session_verification};
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::audit::AuditSink;
use crate::error::{AuthError, StoreError};
use crate::reaper::SessionReaper;
use crate::roles::RoleProvider;
use crate::store::PgSessionStore;

/// Cheap to clone; every clone shares the same cache.
#[derive(Clone)]
pub struct SessionService {
    inner: Arc<Inner>,
}

struct Inner {
    roles: Arc<dyn RoleProvider>,
    store: PgSessionStore,
    cache: Arc<SessionCache>,
    audit: AuditSink,
    config: SessionConfig,
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("cache", &self.inner.cache)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl SessionService {
    pub fn new(pool: PgPool, roles: Arc<dyn RoleProvider>, config: SessionConfig) -> Self {
        let cache = Arc::new(SessionCache::new(config.cache_max_age));

        Self {
            inner: Arc::new(Inner {
                roles,
                store: PgSessionStore::new(pool.clone()),
                cache,
                audit: AuditSink::new(pool),
                config,
            }),
        }
    }

    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.inner.cache
    }

    pub fn store(&self) -> &PgSessionStore {
        &self.inner.store
    }

    pub fn audit(&self) -> &AuditSink {
        &self.inner.audit
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn resolve_role(&self, email: &str) -> Role {
        self.inner.roles.resolve(email)
    }

    /// A reaper over this service's cache and store.
    pub fn reaper(&self) -> SessionReaper {
        SessionReaper::new(
            Arc::clone(&self.inner.cache),
            self.inner.store.clone(),
            self.inner.config.reaper_interval,
        )
    }

    /// Issues a session for an allowlisted email.
    ///
    /// The session exists only once the store insert has succeeded; a store
    /// failure is returned and nothing is cached.
    pub async fn login(&self, email: &str, provenance: Provenance) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AuthError::Validation("Email is required".to_string()));
        }

        let role = self.resolve_role(&email);
        if !role.can_hold_session() {
            track_login(role.as_str(), "denied");
            warn!("Login rejected for address outside the role lists");
            return Err(AuthError::access_denied());
        }

        let session = match self
            .inner
            .store
            .create(&email, role, self.inner.config.ttl, &provenance)
            .await
        {
            Ok(session) => session,
            Err(e) => {
                track_login(role.as_str(), "error");
                warn!(role = %role, error = %e, "Session could not be persisted");
                return Err(AuthError::Persistence(e));
            }
        };

        self.inner.cache.put(session.clone());

        let details = format!(
            "session {} from {}",
            token_fragment(&session.token),
            provenance.ip_address.as_deref().unwrap_or("unknown")
        );
        let _ = self
            .inner
            .audit
            .record(AuditAction::Login, &session.email, details);

        track_login(role.as_str(), "success");
        info!(email = %session.email, role = %role, "Session created");

        Ok(session)
    }

    /// Resolves a bearer token to a live session.
    ///
    /// Cache first, then the store under the configured lookup timeout. Any
    /// store failure or timeout yields `None`.
    pub async fn verify(&self, token: &str) -> Option<Session> {
        if token.is_empty() {
            track_session_verification("none");
            return None;
        }

        if let Some(session) = self.inner.cache.get(token) {
            track_session_verification("cache");
            return Some(session);
        }

        match self.lookup(token).await {
            Ok(Some(session)) => {
                // A destroy on this process may have landed after the read.
                if !self.inner.cache.put(session.clone()) {
                    track_session_verification("none");
                    debug!(token = %token_fragment(token), "Session revoked during lookup");
                    return None;
                }
                self.touch_in_background(token);
                track_session_verification("store");
                Some(session)
            }
            Ok(None) => {
                track_session_verification("none");
                None
            }
            Err(e) => {
                track_session_verification("none");
                warn!(token = %token_fragment(token), error = %e, "Session lookup failed, rejecting");
                None
            }
        }
    }

    /// Ends a session. Destroying an unknown or already destroyed token succeeds.
    ///
    /// The token is revoked in the local cache before the store delete, so this
    /// process stops accepting it even when the delete fails or a concurrent
    /// verify is still reading the row.
    pub async fn destroy(&self, token: &str) -> Result<(), AuthError> {
        self.inner.cache.revoke(token, self.inner.config.ttl);

        match self.inner.store.delete(token).await? {
            Some(email) => {
                let _ = self.inner.audit.record(
                    AuditAction::Logout,
                    &email,
                    format!("session {} ended", token_fragment(token)),
                );
                info!(email = %email, "Session destroyed");
            }
            None => debug!(token = %token_fragment(token), "Logout for unknown session"),
        }

        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Option<Session>, StoreError> {
        tokio::time::timeout(
            self.inner.config.lookup_timeout,
            self.inner.store.find_valid(token),
        )
        .await
        .map_err(|_| StoreError::Timeout)?
    }

    fn touch_in_background(&self, token: &str) {
        let store = self.inner.store.clone();
        let token = token.to_string();

        tokio::spawn(async move {
            if let Err(e) = store.touch(&token).await {
                debug!(token = %token_fragment(&token), error = %e, "Session touch failed");
            }
        });
    }
}
