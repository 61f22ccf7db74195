//! Periodic removal of expired sessions from the cache and the store.

use std::sync::Arc;
use std::time::Duration;

use conclave_cache::SessionCache;
use conclave_observability::track_sessions_reaped;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use crate::error::StoreError;
use crate::store::PgSessionStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReapReport {
    pub cache_evicted: usize,
    pub store_deleted: u64,
}

#[derive(Clone, Debug)]
pub struct SessionReaper {
    cache: Arc<SessionCache>,
    store: PgSessionStore,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(cache: Arc<SessionCache>, store: PgSessionStore, interval: Duration) -> Self {
        Self {
            cache,
            store,
            interval,
        }
    }

    /// One sweep: the local cache first, then the shared table.
    pub async fn run_once(&self) -> Result<ReapReport, StoreError> {
        let cache_evicted = self.cache.sweep();
        let store_deleted = self.store.delete_expired().await?;

        track_sessions_reaped(cache_evicted as u64, store_deleted);
        info!(cache_evicted, store_deleted, "Expired sessions reaped");

        Ok(ReapReport {
            cache_evicted,
            store_deleted,
        })
    }

    /// Runs [`run_once`](Self::run_once) every interval until `shutdown` flips to
    /// `true` or its sender is dropped. The first sweep happens one interval
    /// after spawning. A failed sweep is logged and retried on the next tick.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(interval_secs = self.interval.as_secs(), "Session reaper started");

            let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.run_once().await {
                            error!(error = %e, "Session reap failed; retrying next interval");
                        }
                    }
                }
            }

            info!("Session reaper stopped");
        })
    }
}
