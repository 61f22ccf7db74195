use anyhow::Context as _;
use axum::Router;
use conclave::router::init_router;
use conclave::state::init_app_state;
use conclave_config::ServerConfig;
use conclave_observability::{init_metrics, init_tracing, metrics_app, shutdown_tracer};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing();
    let metrics_handle = init_metrics();

    let state = init_app_state()
        .await
        .context("Failed to connect to the database")?;

    conclave_db::run_migrations(&state.db)
        .await
        .context("Failed to run migrations")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reaper = state.sessions.reaper().spawn(shutdown_rx);

    let mut app: Router = init_router(state);
    if let Some(handle) = metrics_handle {
        app = app.merge(metrics_app(handle));
    }

    let server_config = ServerConfig::from_env();
    let addr = server_config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Server running");
    info!("Swagger UI available at http://{addr}/swagger-ui");
    info!("Scalar UI available at http://{addr}/scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = reaper.await {
        warn!(error = %e, "Session reaper did not stop cleanly");
    }

    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
