//! Per-Outlet Collection
//!
//! Probes one outlet and maps the [`ProbeOutcome`] onto gauge observations.
//!
//! # Metrics Produced
//! - Unreachable: `tasmota_up` = 0, nothing else
//! - Reachable: `tasmota_up` = 1, `tasmota_on`, then the ten raw measurements

use super::{CollectionContext, CollectionStatus, MetricObservation};
use crate::metrics::TasmotaMetric;
use crate::outlet::Outlet;
use crate::tasmota::{DeviceSnapshot, ProbeOutcome};
use tracing::{info, warn};

/// Observations a probe outcome produces for one outlet label
pub fn observations_for(outlet: &str, outcome: &ProbeOutcome) -> Vec<MetricObservation> {
    match outcome {
        ProbeOutcome::Unreachable(_) => {
            vec![MetricObservation::new(TasmotaMetric::Up, outlet, 0.0)]
        }
        ProbeOutcome::Reachable(snapshot) => snapshot_observations(outlet, snapshot),
    }
}

fn snapshot_observations(outlet: &str, snapshot: &DeviceSnapshot) -> Vec<MetricObservation> {
    let on = if snapshot.power_on() { 1.0 } else { 0.0 };

    [
        (TasmotaMetric::Up, 1.0),
        (TasmotaMetric::On, on),
        (TasmotaMetric::Voltage, snapshot.voltage),
        (TasmotaMetric::Current, snapshot.current),
        (TasmotaMetric::Power, snapshot.active_power),
        (TasmotaMetric::ApparentPower, snapshot.apparent_power),
        (TasmotaMetric::ReactivePower, snapshot.reactive_power),
        (TasmotaMetric::PowerFactor, snapshot.power_factor),
        (TasmotaMetric::TodayKwh, snapshot.energy_today),
        (TasmotaMetric::YesterdayKwh, snapshot.energy_yesterday),
        (TasmotaMetric::TotalKwh, snapshot.energy_total),
        (TasmotaMetric::Temperature, snapshot.chip_temperature),
    ]
    .into_iter()
    .map(|(metric, value)| MetricObservation::new(metric, outlet, value))
    .collect()
}

/// Probes one outlet and writes its gauges
///
/// Never fails: an unreachable device yields a single `tasmota_up` = 0 observation.
pub async fn collect_outlet_metrics(
    ctx: &CollectionContext<'_>,
    outlet: &Outlet,
) -> (CollectionStatus, Vec<MetricObservation>) {
    let outcome = ctx.client.probe(&outlet.address).await;

    let status = match &outcome {
        ProbeOutcome::Reachable(snapshot) => {
            info!(
                outlet = %outlet.name,
                address = %outlet.address,
                power_watts = snapshot.active_power,
                "outlet probe successful"
            );
            CollectionStatus::Success
        }
        ProbeOutcome::Unreachable(e) => {
            warn!(
                outlet = %outlet.name,
                address = %outlet.address,
                error = %e,
                "outlet probe failed"
            );
            CollectionStatus::Failed
        }
    };

    let observations = observations_for(&outlet.name, &outcome);
    for observation in &observations {
        ctx.metrics
            .set(observation.metric, &observation.outlet, observation.value);
    }

    (status, observations)
}
