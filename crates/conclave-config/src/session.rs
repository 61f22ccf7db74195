//! Session lifetime configuration.
//!
//! # Environment Variables
//!
//! - `SESSION_TTL_SECONDS`: Lifetime of a session from creation (default: 30 days)
//! - `SESSION_REAPER_INTERVAL_SECONDS`: Period of the expired-session sweep (default: 1 hour)
//! - `SESSION_LOOKUP_TIMEOUT_MS`: Upper bound on a store read during verification (default: 2000)
//! - `SESSION_CACHE_MAX_AGE_SECONDS`: Optional age after which a cached session must be
//!   re-read from the store (default: unset, cache entries live until the session expires)

use std::time::Duration;

use crate::env_parse;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);
pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(2_000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed lifetime applied to every new session.
    pub ttl: Duration,

    /// How often the reaper sweeps the cache and the store.
    pub reaper_interval: Duration,

    /// Request-level bound on a store round-trip while verifying a token.
    /// Exceeding it counts as a store failure and the request is rejected.
    pub lookup_timeout: Duration,

    /// When set, cache hits older than this are treated as misses.
    pub cache_max_age: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_SESSION_TTL,
            reaper_interval: DEFAULT_REAPER_INTERVAL,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            cache_max_age: None,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables, falling back to defaults
    /// for anything unset, unparsable or zero.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            ttl: env_parse::<u64>("SESSION_TTL_SECONDS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
            reaper_interval: env_parse::<u64>("SESSION_REAPER_INTERVAL_SECONDS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.reaper_interval),
            lookup_timeout: env_parse::<u64>("SESSION_LOOKUP_TIMEOUT_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.lookup_timeout),
            cache_max_age: env_parse::<u64>("SESSION_CACHE_MAX_AGE_SECONDS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(2_592_000));
        assert_eq!(config.reaper_interval, Duration::from_secs(3_600));
        assert_eq!(config.lookup_timeout, Duration::from_secs(2));
        assert_eq!(config.cache_max_age, None);
    }

    #[test]
    fn test_config_clone() {
        let config = SessionConfig {
            cache_max_age: Some(Duration::from_secs(60)),
            ..SessionConfig::default()
        };
        assert_eq!(config.clone(), config);
    }
}
