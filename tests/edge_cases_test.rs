//! Edge case tests
//!
//! Tests for unusual but valid data scenarios.

use serde_json::json;
use std::sync::Arc;
use tasmota_exporter::metrics::{MetricsCollector, TasmotaMetric};
use tasmota_exporter::outlet::{parse_outlets, Outlet, OutletRegistry};
use tasmota_exporter::tasmota::types::StatusResponse;
use tasmota_exporter::tasmota::DeviceSnapshot;

/// Helper to create a test metrics instance
fn create_test_metrics() -> MetricsCollector {
    MetricsCollector::new().expect("Failed to create metrics")
}

#[test]
fn test_empty_collections_render_without_error() {
    // Given: A metrics collector with no data set
    let metrics = create_test_metrics();

    // When: Rendering metrics
    let result = metrics.render();

    // Then: Should render successfully
    assert!(result.is_ok());
}

#[test]
fn test_outlet_name_with_spaces() {
    // Given: An outlet configured with inner spaces
    let outlets = parse_outlets("living room:192.168.1.100");
    assert_eq!(outlets, vec![Outlet::new("living room", "192.168.1.100")]);

    // When: Rendering its metrics
    let metrics = create_test_metrics();
    metrics.set(TasmotaMetric::Up, &outlets[0].name, 1.0);
    let rendered = metrics.render().expect("Failed to render");

    // Then: The label keeps the space
    assert!(rendered.contains("tasmota_up{outlet=\"living room\"} 1"));
}

#[test]
fn test_unicode_in_outlet_names() {
    let metrics = create_test_metrics();

    metrics.set(TasmotaMetric::Power, "küche", 12.0);
    metrics.set(TasmotaMetric::Power, "客厅", 8.0);

    let rendered = metrics.render().expect("Failed to render");
    assert!(rendered.contains("küche"));
    assert!(rendered.contains("客厅"));
}

#[test]
fn test_quotes_in_outlet_names_are_escaped() {
    let metrics = create_test_metrics();

    metrics.set(TasmotaMetric::Up, "plug \"a\"", 1.0);

    let rendered = metrics.render().expect("Failed to render");
    assert!(rendered.contains("outlet=\"plug \\\"a\\\"\""));
}

#[test]
fn test_hostname_addresses() {
    let outlets = parse_outlets("desk:plug-desk.local, tv:tasmota-4F2A.lan");

    assert_eq!(
        outlets,
        vec![
            Outlet::new("desk", "plug-desk.local"),
            Outlet::new("tv", "tasmota-4F2A.lan"),
        ]
    );
}

#[test]
fn test_trailing_and_repeated_commas() {
    let outlets = parse_outlets(",,desk:10.0.0.2,,tv:10.0.0.3,");

    assert_eq!(outlets.len(), 2);
    assert_eq!(outlets[0].name, "desk");
    assert_eq!(outlets[1].name, "tv");
}

#[test]
fn test_duplicate_names_are_kept() {
    let registry = OutletRegistry::parse("desk:10.0.0.2,desk:10.0.0.3");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.outlets()[0].address, "10.0.0.2");
    assert_eq!(registry.outlets()[1].address, "10.0.0.3");
    assert_eq!(registry.duplicate_names(), vec!["desk"]);
}

#[test]
fn test_esp8266_payload_without_temperature() {
    // Given: A device without an ESP32 block
    let status: StatusResponse = serde_json::from_value(json!({
        "StatusSNS": {
            "Time": "2025-01-15T10:30:00",
            "ENERGY": {"Power": 5.0, "Voltage": 229.0}
        }
    }))
    .expect("Failed to parse");

    // When: Converting to a snapshot
    let snapshot = DeviceSnapshot::from(status);

    // Then: Temperature defaults to zero
    assert_eq!(snapshot.chip_temperature, 0.0);
    assert_eq!(snapshot.active_power, 5.0);
    assert!(snapshot.power_on());
}

#[test]
fn test_empty_object_is_a_valid_status() {
    let status: StatusResponse = serde_json::from_str("{}").expect("Failed to parse");
    let snapshot = DeviceSnapshot::from(status);

    assert_eq!(snapshot, DeviceSnapshot::default());
    assert!(!snapshot.power_on());
}

#[test]
fn test_non_numeric_power_is_rejected() {
    let result: Result<StatusResponse, _> = serde_json::from_value(json!({
        "StatusSNS": {"ENERGY": {"Power": "on"}}
    }));

    assert!(result.is_err());
}

#[test]
fn test_negative_power_counts_as_off() {
    let snapshot = DeviceSnapshot {
        active_power: -0.1,
        ..Default::default()
    };

    assert!(!snapshot.power_on());
}

#[test]
fn test_very_large_energy_totals() {
    let metrics = create_test_metrics();

    metrics.set(TasmotaMetric::TotalKwh, "heatpump", 123_456_789.125);

    let rendered = metrics.render().expect("Failed to render");
    assert!(rendered.contains("tasmota_kwh_total{outlet=\"heatpump\"} 123456789.125"));
}

#[test]
fn test_concurrent_metric_updates() {
    // Given: One writer thread per outlet label
    let metrics = Arc::new(create_test_metrics());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let metrics = metrics.clone();
            std::thread::spawn(move || {
                let outlet = format!("plug-{}", i);
                for value in 0..100 {
                    metrics.set(TasmotaMetric::Power, &outlet, value as f64);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Writer panicked");
    }

    // Then: Every label holds its last write
    let rendered = metrics.render().expect("Failed to render");
    for i in 0..8 {
        assert!(rendered.contains(&format!("tasmota_power_watts{{outlet=\"plug-{}\"}} 99", i)));
    }
}

#[test]
fn test_metrics_stability_after_multiple_renders() {
    let metrics = create_test_metrics();
    metrics.set(TasmotaMetric::Up, "desk", 1.0);

    let render1 = metrics.render().expect("First render failed");
    let render2 = metrics.render().expect("Second render failed");

    assert_eq!(render1, render2, "Metrics rendering is not stable");
}
