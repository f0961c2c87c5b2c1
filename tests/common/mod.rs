//! Mock Tasmota devices for integration tests
//!
//! Each device is an axum router served on an ephemeral localhost port.

#![allow(dead_code)]

use axum::{
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tasmota_exporter::collectors::{MetricObservation, TasmotaCollector};
use tasmota_exporter::metrics::{MetricsCollector, TasmotaMetric};
use tasmota_exporter::outlet::{Outlet, OutletRegistry};
use tasmota_exporter::tasmota::TasmotaClient;
use tokio::net::TcpListener;

/// Status 10 payload of a plug drawing 45.2 W
pub fn sample_status() -> Value {
    json!({
        "StatusSNS": {
            "Time": "2025-01-15T10:30:00",
            "ENERGY": {
                "TotalStartTime": "2025-01-15T00:00:00",
                "Total": 1.5,
                "Yesterday": 0.8,
                "Today": 0.7,
                "Power": 45.2,
                "ApparentPower": 50.0,
                "ReactivePower": 20.0,
                "Factor": 0.9,
                "Voltage": 240.0,
                "Current": 0.2
            },
            "ESP32": {"Temperature": 42.5}
        }
    })
}

/// Same payload with the plug switched off
pub fn switched_off_status() -> Value {
    let mut status = sample_status();
    status["StatusSNS"]["ENERGY"]["Power"] = json!(0);
    status
}

fn is_status_command(query: &HashMap<String, String>) -> bool {
    query.get("cmnd").map(String::as_str) == Some("status 10")
}

/// Device answering `status 10` with `body`
pub fn device(body: Value) -> Router {
    Router::new().route(
        "/cm",
        get(move |Query(query): Query<HashMap<String, String>>| {
            let body = body.clone();
            async move {
                if is_status_command(&query) {
                    Json(body).into_response()
                } else {
                    (StatusCode::NOT_FOUND, "not found").into_response()
                }
            }
        }),
    )
}

/// Device that always answers with a plain text error page
pub fn failing_device() -> Router {
    Router::new().route(
        "/cm",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "internal server error\n") }),
    )
}

/// Device returning a truncated JSON document with status 200
pub fn malformed_device() -> Router {
    Router::new().route(
        "/cm",
        get(|| async { (StatusCode::OK, r#"{"StatusSNS": {"ENERGY": {"Power": 4"#) }),
    )
}

/// Device that answers only after `delay`
pub fn slow_device(delay: Duration) -> Router {
    let body = sample_status();
    Router::new().route(
        "/cm",
        get(move || {
            let body = body.clone();
            async move {
                tokio::time::sleep(delay).await;
                Json(body)
            }
        }),
    )
}

/// Device that answers the first `healthy_requests` requests, then fails
pub fn flaky_device(healthy_requests: usize) -> Router {
    let served = Arc::new(AtomicUsize::new(0));
    let body = sample_status();
    Router::new().route(
        "/cm",
        get(move || {
            let served = served.clone();
            let body = body.clone();
            async move {
                if served.fetch_add(1, Ordering::SeqCst) < healthy_requests {
                    Json(body).into_response()
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error\n").into_response()
                }
            }
        }),
    )
}

/// Serve a router on an ephemeral port and return its address
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock device");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mock device failed");
    });
    addr
}

/// Address nothing is listening on
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    drop(listener);
    addr
}

pub fn outlet(name: &str, addr: SocketAddr) -> Outlet {
    Outlet::new(name, addr.to_string())
}

pub fn create_collector(outlets: Vec<Outlet>, timeout: Duration) -> TasmotaCollector {
    let client = TasmotaClient::new(timeout).expect("Failed to create client");
    let metrics = MetricsCollector::new().expect("Failed to create metrics");
    TasmotaCollector::new(OutletRegistry::new(outlets), client, metrics)
}

pub fn observations_of<'a>(
    observations: &'a [MetricObservation],
    outlet: &str,
) -> Vec<&'a MetricObservation> {
    observations.iter().filter(|o| o.outlet == outlet).collect()
}

pub fn value_of(observations: &[MetricObservation], outlet: &str, metric: TasmotaMetric) -> Option<f64> {
    observations
        .iter()
        .find(|o| o.outlet == outlet && o.metric == metric)
        .map(|o| o.value)
}
