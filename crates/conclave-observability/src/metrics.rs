use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::time::{Duration, Instant};
use tracing::error;

use crate::is_observability_enabled;

pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Initialize Prometheus metrics exporter with upkeep task
/// Returns None if observability is disabled or a recorder is already installed
pub fn init_metrics() -> Option<MetricsHandle> {
    if !is_observability_enabled() {
        return None;
    }

    let builder = match PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
        ],
    ) {
        Ok(builder) => builder,
        Err(e) => {
            error!(error = %e, "Failed to set histogram buckets");
            return None;
        }
    };

    let handle = match builder.install_recorder() {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "Failed to install Prometheus recorder");
            return None;
        }
    };

    // Spawn upkeep task to clean stale metrics
    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Some(handle)
}

/// Metrics middleware to track HTTP requests
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let uri_path = req.uri().path().to_owned();

    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or(uri_path);

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status).increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// Router for the Prometheus scrape endpoint
pub fn metrics_app(handle: MetricsHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

// Session metrics helpers

/// `status` is one of `success`, `denied` or `error`.
pub fn track_login(role: &str, status: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("session_logins_total", "role" => role.to_string(), "status" => status.to_string())
        .increment(1);
}

/// `source` is `cache`, `store` or `none` (rejected).
pub fn track_session_verification(source: &str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("session_verifications_total", "source" => source.to_string()).increment(1);
}

pub fn track_sessions_reaped(cache_evicted: u64, store_deleted: u64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("sessions_reaped_total", "tier" => "cache").increment(cache_evicted);
    counter!("sessions_reaped_total", "tier" => "store").increment(store_deleted);
}

pub fn track_audit_write_failure() {
    if !is_observability_enabled() {
        return;
    }
    counter!("audit_write_failures_total").increment(1);
}

/// Track authorization checks made by the role guard
pub fn track_authorization_check(allowed: bool, role: &str) {
    if !is_observability_enabled() {
        return;
    }
    let outcome = if allowed { "allowed" } else { "denied" };
    counter!("authorization_checks_total", "outcome" => outcome, "role" => role.to_string())
        .increment(1);
}
