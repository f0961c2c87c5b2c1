//! Metrics Collectors
//!
//! Runs one collection cycle per scrape: every configured outlet is probed
//! concurrently and the results are written to the gauge registry.
//!
//! # Architecture
//!
//! - [`TasmotaCollector`] owns the outlet registry, the device client and the metrics
//! - [`TasmotaCollector::collect`] spawns one task per outlet and joins them all
//! - [`outlet::collect_outlet_metrics`] maps a single outcome onto gauges
//!
//! # Error Handling
//!
//! Probe failures stay local to their outlet. They are logged as warnings and
//! reported as `tasmota_up` = 0; `collect` itself cannot fail.
//!
//! # Cancellation
//!
//! Probe tasks are detached from the caller. Dropping the `collect` future (a
//! scraper disconnecting mid-request) does not stop them; each task still runs to
//! its own deadline and writes its gauges.
//!
//! # Ordering
//!
//! Probes complete in any order. Callers must not rely on the order of the returned
//! observations.

use crate::metrics::{MetricsCollector, TasmotaMetric};
use crate::outlet::{Outlet, OutletRegistry};
use crate::tasmota::TasmotaClient;
use futures_util::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub mod outlet;

pub use outlet::{collect_outlet_metrics, observations_for};

/// Shared context passed to per-outlet collection
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Client used to probe devices
    pub client: &'a TasmotaClient,
    /// Gauge storage updated with each outcome
    pub metrics: &'a MetricsCollector,
}

/// Status of a single outlet's collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// The device answered and all gauges were written
    Success,
    /// The device could not be probed (already logged as warning)
    Failed,
}

/// One gauge value for one outlet, produced by a scrape
#[derive(Debug, Clone, PartialEq)]
pub struct MetricObservation {
    pub metric: TasmotaMetric,
    pub outlet: String,
    pub value: f64,
}

impl MetricObservation {
    pub fn new(metric: TasmotaMetric, outlet: impl Into<String>, value: f64) -> Self {
        Self {
            metric,
            outlet: outlet.into(),
            value,
        }
    }

    pub fn metric_name(&self) -> &'static str {
        self.metric.name()
    }
}

/// Scrape-driven collector for all configured outlets
pub struct TasmotaCollector {
    outlets: OutletRegistry,
    client: TasmotaClient,
    metrics: MetricsCollector,
}

impl TasmotaCollector {
    pub fn new(outlets: OutletRegistry, client: TasmotaClient, metrics: MetricsCollector) -> Self {
        Self {
            outlets,
            client,
            metrics,
        }
    }

    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Probe every outlet concurrently and wait for all of them
    ///
    /// Each probe carries its own deadline, so a scrape takes about as long as the
    /// slowest single probe.
    pub async fn collect(&self) -> Vec<MetricObservation> {
        let handles: Vec<_> = self
            .outlets
            .iter()
            .map(|outlet| (outlet.name.clone(), self.spawn_probe(outlet.clone())))
            .collect();

        let metrics = &self.metrics;
        let results = join_all(handles.into_iter().map(|(name, handle)| async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!(outlet = %name, error = %e, "outlet probe task failed");
                    metrics.set(TasmotaMetric::Up, &name, 0.0);
                    (
                        CollectionStatus::Failed,
                        vec![MetricObservation::new(TasmotaMetric::Up, name, 0.0)],
                    )
                }
            }
        }))
        .await;

        let reachable = results
            .iter()
            .filter(|(status, _)| *status == CollectionStatus::Success)
            .count();
        debug!(
            outlets = results.len(),
            reachable,
            "Collected metrics from outlets"
        );

        results
            .into_iter()
            .flat_map(|(_, observations)| observations)
            .collect()
    }

    fn spawn_probe(
        &self,
        outlet: Outlet,
    ) -> JoinHandle<(CollectionStatus, Vec<MetricObservation>)> {
        let client = self.client.clone();
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let ctx = CollectionContext {
                client: &client,
                metrics: &metrics,
            };
            collect_outlet_metrics(&ctx, &outlet).await
        })
    }
}
