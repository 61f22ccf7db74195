//! # Conclave Config
//!
//! Configuration types for the Conclave API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`session`]: Session lifetime, reaper cadence and store lookup bounds
//! - [`roles`]: Static role-membership lists (admin, board, advisory)
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//!
//! # Example
//!
//! ```ignore
//! use conclave_config::{CorsConfig, RoleConfig, ServerConfig, SessionConfig};
//!
//! // Load all configs from environment
//! let session_config = SessionConfig::from_env();
//! let role_config = RoleConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod roles;
pub mod server;
pub mod session;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use roles::RoleConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

/// Splits a comma-separated environment value into trimmed, non-empty entries.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Reads and parses an environment variable, returning `None` when unset or unparsable.
pub(crate) fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
