//! HTTP Server
//!
//! Serves the Prometheus endpoint. Collection is scrape-driven: every request to
//! `/metrics` probes all outlets before rendering.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to metrics and health
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - Liveness check (always 200 while serving)
//!
//! # Error Handling
//!
//! Device failures never fail a scrape; they show up as `tasmota_up` = 0. Only a
//! failure to encode the registry returns 500.

use crate::collectors::TasmotaCollector;
use crate::config::Config;
use crate::error::{ExporterError, Result};
use crate::metrics::MetricsCollector;
use crate::outlet::OutletRegistry;
use crate::tasmota::TasmotaClient;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Content type of the Prometheus text exposition format
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Clone)]
struct AppState {
    collector: Arc<TasmotaCollector>,
}

pub async fn start(config: Config, outlets: OutletRegistry) -> anyhow::Result<()> {
    let metrics = MetricsCollector::new()?;
    let client = TasmotaClient::new(config.tasmota.probe_timeout())?;
    let collector = Arc::new(TasmotaCollector::new(outlets, client, metrics));

    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = bind(&addr).await?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    serve(listener, collector).await?;
    Ok(())
}

pub async fn bind(addr: &str) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|e| ExporterError::Server(format!("failed to bind {}: {}", addr, e)))
}

/// Serve the exporter on an already bound listener until Ctrl-C or SIGTERM
pub async fn serve(listener: TcpListener, collector: Arc<TasmotaCollector>) -> Result<()> {
    axum::serve(listener, router(collector))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server closed");
    Ok(())
}

pub fn router(collector: Arc<TasmotaCollector>) -> Router {
    let state = AppState { collector };

    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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

async fn root_handler() -> impl IntoResponse {
    Html(
        r#"<html>
<head><title>Tasmota Exporter</title></head>
<body>
<h1>Tasmota Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    state.collector.collect().await;

    match state.collector.metrics().render() {
        Ok(metrics) => ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], metrics).into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
