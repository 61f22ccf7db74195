//! Conclave Observability Module
//!
//! Provides configurable observability features including:
//! - Structured logging and distributed tracing via OpenTelemetry
//! - Metrics collection via Prometheus
//! - HTTP request/response logging
//!
//! This module can be enabled or disabled at compile time via the `observability` feature flag.
//! At runtime, observability can be further controlled via the `OBSERVABILITY_ENABLED` environment variable.
//! Console logging is always available.
//!
//! # Features
//!
//! - `observability` (default): Enables file logging, OpenTelemetry export and Prometheus metrics
//!
//! # Examples
//!
//! ```no_run
//! use conclave_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

use std::sync::OnceLock;

pub mod basic_logging;
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use logging::{init_tracing, logging_middleware, shutdown_tracer};

#[cfg(feature = "observability")]
pub use crate::metrics::{
    MetricsHandle, init_metrics, metrics_app, metrics_middleware, track_audit_write_failure,
    track_authorization_check, track_login, track_sessions_reaped, track_session_verification,
};

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if observability is enabled via OBSERVABILITY_ENABLED env var
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        cfg!(feature = "observability")
            && std::env::var("OBSERVABILITY_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true) // Enabled by default
    })
}

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    /// Placeholder handle when the Prometheus exporter is not compiled in
    #[derive(Clone, Debug)]
    pub struct MetricsHandle;

    /// No-op metrics initialization when feature disabled
    pub fn init_metrics() -> Option<MetricsHandle> {
        None
    }

    /// No-op metrics middleware when feature disabled
    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Empty router when feature disabled
    pub fn metrics_app(_handle: MetricsHandle) -> Router {
        Router::new()
    }

    // No-op tracking functions
    pub fn track_login(_role: &str, _status: &str) {}
    pub fn track_session_verification(_source: &str) {}
    pub fn track_sessions_reaped(_cache_evicted: u64, _store_deleted: u64) {}
    pub fn track_audit_write_failure() {}
    pub fn track_authorization_check(_allowed: bool, _role: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;
