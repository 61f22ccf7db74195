use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize basic console logging when observability is disabled.
///
/// This provides a minimal but functional logging setup that enables console output
/// for all tracing macros (info!, warn!, error!, debug!, etc.) throughout the application.
///
/// # Configuration
///
/// - **Log Level**: Controlled by `LOG_LEVEL` environment variable (default: "info")
/// - **Filtering**: Noisy dependencies filtered to warn level for cleaner output
/// - **Format**: Compact format with ANSI colors
/// - **Target**: Shows module paths (e.g., "conclave_auth::service")
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "conclave={log_level},conclave_auth={log_level},conclave_cache={log_level},tower_http=warn,hyper=warn,sqlx=warn",
        ))
    });

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_filter(env_filter);

    // try_init: a subscriber may already be installed (tests, embedding binaries)
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
