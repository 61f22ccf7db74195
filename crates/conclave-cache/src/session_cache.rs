//! Token to session map with local expiry checks.

use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, instrument};

use conclave_models::Session;

#[derive(Clone)]
struct CachedSession {
    session: Session,
    cached_at: DateTime<Utc>,
}

#[derive(Clone)]
enum Slot {
    Live(CachedSession),
    /// Left behind by [`SessionCache::revoke`]. Refuses writes for the token
    /// until `until`, after which no store row for it can still be valid.
    Revoked { until: DateTime<Utc> },
}

/// Concurrent, process-local session cache.
///
/// Entries carry no expiry authority of their own beyond the `expires_at`
/// copied from the store row.
pub struct SessionCache {
    entries: DashMap<String, Slot>,
    max_age: Option<chrono::Duration>,
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.len())
            .field("max_age", &self.max_age)
            .finish()
    }
}

impl Default for SessionCache {
    fn default() -> Self {
        Self::new(None)
    }
}

impl SessionCache {
    /// Creates an empty cache. With `max_age` set, entries cached longer ago
    /// than that are reported as misses so the caller re-reads the store.
    pub fn new(max_age: Option<Duration>) -> Self {
        Self {
            entries: DashMap::new(),
            max_age: max_age.and_then(|age| chrono::Duration::from_std(age).ok()),
        }
    }

    /// Returns the cached session if present and not yet expired.
    ///
    /// An expired (or over-age) entry is evicted and reported as a miss.
    pub fn get(&self, token: &str) -> Option<Session> {
        self.get_at(token, Utc::now())
    }

    pub fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        match self.entries.get(token).as_deref() {
            Some(Slot::Live(cached)) if !self.is_stale(cached, now) => {
                return Some(cached.session.clone());
            }
            Some(Slot::Live(_)) => {}
            Some(Slot::Revoked { .. }) | None => return None,
        }

        // The read guard must be released before removing from the same shard.
        if self
            .entries
            .remove_if(token, |_, slot| {
                matches!(slot, Slot::Live(cached) if self.is_stale(cached, now))
            })
            .is_some()
        {
            debug!("Evicted stale session from cache");
        }

        None
    }

    /// Write-through after a successful store create or store-backed verify.
    ///
    /// Returns `false`, caching nothing, when the token has been revoked on
    /// this process. The caller must then treat the session as ended.
    pub fn put(&self, session: Session) -> bool {
        let cached = CachedSession {
            session,
            cached_at: Utc::now(),
        };

        match self.entries.entry(cached.session.token.clone()) {
            Entry::Occupied(mut slot) => {
                if matches!(slot.get(), Slot::Revoked { .. }) {
                    return false;
                }
                slot.insert(Slot::Live(cached));
            }
            Entry::Vacant(slot) => {
                slot.insert(Slot::Live(cached));
            }
        }

        true
    }

    /// Removes an entry, returning the session it held.
    pub fn evict(&self, token: &str) -> Option<Session> {
        match self
            .entries
            .remove_if(token, |_, slot| matches!(slot, Slot::Live(_)))
        {
            Some((_, Slot::Live(cached))) => Some(cached.session),
            _ => None,
        }
    }

    /// Ends a token on this process: the live entry (if any) is replaced by a
    /// tombstone so a concurrent store-backed [`put`](Self::put) cannot bring
    /// it back.
    ///
    /// The tombstone lasts until the cached session's expiry, or `ttl` from now
    /// when nothing was cached. Returns the session that was cached.
    pub fn revoke(&self, token: &str, ttl: Duration) -> Option<Session> {
        let horizon = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        match self.entries.entry(token.to_string()) {
            Entry::Occupied(mut slot) => {
                let (previous, until) = match slot.get() {
                    Slot::Live(cached) => (
                        Some(cached.session.clone()),
                        cached.session.expires_at.min(horizon),
                    ),
                    Slot::Revoked { until } => (None, (*until).max(horizon)),
                };
                slot.insert(Slot::Revoked { until });
                previous
            }
            Entry::Vacant(slot) => {
                slot.insert(Slot::Revoked { until: horizon });
                None
            }
        }
    }

    /// Evicts every expired entry and every lapsed tombstone. Returns the
    /// number removed.
    #[instrument(skip(self))]
    pub fn sweep(&self) -> usize {
        self.sweep_at(Utc::now())
    }

    pub fn sweep_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, slot| match slot {
            Slot::Live(cached) => !cached.session.is_expired_at(now),
            Slot::Revoked { until } => *until > now,
        });
        let removed = before.saturating_sub(self.entries.len());

        debug!(removed, remaining = self.entries.len(), "Session cache swept");

        removed
    }

    /// Number of live sessions. Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|slot| matches!(slot.value(), Slot::Live(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_stale(&self, cached: &CachedSession, now: DateTime<Utc>) -> bool {
        cached.session.is_expired_at(now)
            || self
                .max_age
                .is_some_and(|max_age| now - cached.cached_at > max_age)
    }
}
