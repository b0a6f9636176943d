//! HTTP Server and Lifecycle
//!
//! This module wires the snapshot store, the refresh loop and the Axum router together.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing `/metrics`, `/health`, `/exporter/metrics` and `/`
//! - **Refresh Loop**: Background task that periodically queries the Nature Remo API
//!   and replaces the snapshot (see [`crate::refresh`])
//! - **State Management**: One `SnapshotStore` shared by the refresh task and the handlers
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page
//! - `GET /metrics` - Sensor and appliance gauges rendered from the latest snapshot
//! - `GET /health` - 200 if the last refresh reached the API, 503 otherwise
//! - `GET /exporter/metrics` - Exporter operational metrics
//!
//! # Shutdown
//!
//! On the shutdown signal the server stops accepting connections and drains in-flight
//! requests. The refresh loop is told to stop afterwards, and [`serve`] returns only once
//! both have finished.

use crate::config::{Config, ServerConfig};
use crate::error::{ExporterError, Result};
use crate::exposition::render_snapshot;
use crate::metrics::ExporterMetrics;
use crate::refresh::{DataSource, RefreshLoop};
use crate::store::SnapshotStore;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{error, info, warn};

const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
struct AppState {
    store: SnapshotStore,
    metrics: ExporterMetrics,
}

/// Build the router over an existing store
pub fn router(store: SnapshotStore, metrics: ExporterMetrics) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/exporter/metrics", get(exporter_metrics_handler))
        .with_state(AppState { store, metrics })
}

/// Bind the metrics listener
///
/// A bind failure is fatal for the exporter.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = format!("{}:{}", config.addr, config.port);
    TcpListener::bind(&addr)
        .await
        .map_err(|e| ExporterError::Server(format!("Failed to bind to {}: {}", addr, e)))
}

/// Address the listener is actually bound to (resolves port 0)
pub fn local_addr(listener: &TcpListener) -> Result<SocketAddr> {
    Ok(listener.local_addr()?)
}

/// Bind, then serve until a termination signal arrives
pub async fn start(config: Config, source: Arc<dyn DataSource>) -> anyhow::Result<()> {
    let listener = bind(&config.server).await?;
    serve(listener, source, &config, shutdown_signal()).await
}

/// Serve on `listener` until `shutdown` resolves, then stop the refresh loop
pub async fn serve<S>(
    listener: TcpListener,
    source: Arc<dyn DataSource>,
    config: &Config,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let store = SnapshotStore::new();
    let metrics = ExporterMetrics::new()?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let refresh = RefreshLoop::new(
        source,
        store.clone(),
        metrics.clone(),
        Duration::from_secs(config.refresh.interval_seconds),
    );
    let refresh_handle = tokio::spawn(refresh.run(stop_rx));

    let app = router(store, metrics);

    let addr = local_addr(&listener)?;
    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!("Shutdown requested, draining HTTP connections");
        })
        .await;

    // The loop may already be gone if it panicked; nothing left to notify then.
    let _ = stop_tx.send(true);
    if let Err(e) = refresh_handle.await {
        error!("Refresh loop terminated abnormally: {}", e);
    }

    served.map_err(|e| ExporterError::Server(e.to_string()))?;
    info!("Metrics server stopped");
    Ok(())
}

/// Resolves on SIGINT, SIGTERM, SIGHUP or SIGQUIT (Ctrl-C only on non-unix targets)
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::SignalKind;

        tokio::select! {
            _ = wait_for_signal(SignalKind::interrupt()) => {}
            _ = wait_for_signal(SignalKind::terminate()) => {}
            _ = wait_for_signal(SignalKind::hangup()) => {}
            _ = wait_for_signal(SignalKind::quit()) => {}
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal(kind: tokio::signal::unix::SignalKind) {
    match tokio::signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("Failed to install signal handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Nature Remo Exporter</title></head>
<body>
<h1>Nature Remo Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
<p><a href="/exporter/metrics">Exporter metrics</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = render_snapshot(&state.store.read());
    (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.metrics.up.get() > 0.0 {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Nature Remo API unreachable")
    }
}

async fn exporter_metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, TEXT_FORMAT)], metrics).into_response()
        }
        Err(e) => {
            error!("Failed to render exporter metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}
